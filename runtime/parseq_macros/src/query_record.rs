//! A derive macro for implementing the `QueryRecord` trait for structs with named fields.
use darling::{
    FromDeriveInput, FromField, FromMeta,
    util::{Flag, Ignored},
};
use proc_macro::TokenStream;
use quote::{quote, quote_spanned};
use syn::{
    Data, DataStruct, DeriveInput, Fields, GenericArgument, Ident, PathArguments, Type,
    ext::IdentExt, parse_macro_input, spanned::Spanned,
};

#[derive(FromDeriveInput)]
#[darling(supports(struct_named))]
struct QueryRecordInput {
    data: darling::ast::Data<Ignored, ParsedField>,
    generics: syn::Generics,
    ident: syn::Ident,
}

struct ParsedField {
    ident: Ident,
    ty: Type,
    query: Option<String>,
    json: Option<String>,
    parseq: Option<String>,
    flatten: bool,
}

// Nested meta for `#[parseq(flatten)]`
#[derive(Default, Debug, FromMeta)]
#[darling(default)]
struct ParseqOptions {
    flatten: Flag,
}

impl FromField for ParsedField {
    fn from_field(field: &syn::Field) -> darling::Result<Self> {
        let Some(ident) = field.ident.clone() else {
            return Err(darling::Error::custom("`QueryRecord` fields must be named.").with_span(field));
        };
        let mut query = None;
        let mut json = None;
        let mut parseq = None;
        let mut flatten = false;
        for attr in &field.attrs {
            // Attributes that belong to other derives are none of our business.
            let Some(name) = attr.path().get_ident() else {
                continue;
            };
            match name.to_string().as_str() {
                "query" => set_once(&mut query, attr)?,
                "json" => set_once(&mut json, attr)?,
                "parseq" => match &attr.meta {
                    syn::Meta::NameValue(_) => set_once(&mut parseq, attr)?,
                    meta => {
                        let options = ParseqOptions::from_meta(meta)?;
                        flatten |= options.flatten.is_present();
                    }
                },
                _ => continue,
            }
        }

        if flatten && (query.is_some() || json.is_some() || parseq.is_some()) {
            return Err(darling::Error::custom(format!(
                "`{ident}` is an embedded record: its fields are looked up in the parent's namespace, \
                 so it can't have a name of its own.\nRemove the `#[query]`, `#[json]` or `#[parseq = \"..\"]` \
                 attributes from it.",
            ))
            .with_span(&ident));
        }

        Ok(Self {
            ident,
            ty: field.ty.clone(),
            query,
            json,
            parseq,
            flatten,
        })
    }
}

fn set_once(slot: &mut Option<String>, attr: &syn::Attribute) -> darling::Result<()> {
    if slot.is_some() {
        let path = attr.path();
        let name = path.get_ident().map(Ident::to_string).unwrap_or_default();
        return Err(
            darling::Error::custom(format!("`#[{name} = \"..\"]` can only be specified once per field."))
                .with_span(path),
        );
    }
    let tag = String::from_meta(&attr.meta).map_err(|e| e.with_span(&attr.meta))?;
    *slot = Some(tag);
    Ok(())
}

/// How the decoder must treat a field, decided from its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    String,
    Bool,
    Signed,
    Unsigned,
    Array,
    Unsupported,
}

impl Kind {
    fn of(ty: &Type) -> Self {
        if let Some(kind) = scalar_kind(ty) {
            return kind;
        }
        match single_type_argument(ty, "Vec") {
            Some(element) if scalar_kind(element).is_some() => Kind::Array,
            _ => Kind::Unsupported,
        }
    }
}

fn scalar_kind(ty: &Type) -> Option<Kind> {
    let segment = last_segment(ty)?;
    if !segment.arguments.is_none() {
        return None;
    }
    let kind = match segment.ident.to_string().as_str() {
        "String" => Kind::String,
        "bool" => Kind::Bool,
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" => Kind::Signed,
        "u8" | "u16" | "u32" | "u64" | "u128" | "usize" => Kind::Unsigned,
        _ => return None,
    };
    Some(kind)
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path.path.segments.last(),
        Type::Group(group) => last_segment(&group.elem),
        Type::Paren(paren) => last_segment(&paren.elem),
        _ => None,
    }
}

/// `T` if `ty` is `wrapper<T>`.
fn single_type_argument<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let segment = last_segment(ty)?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return None;
    };
    let mut arguments = arguments.args.iter();
    match (arguments.next(), arguments.next()) {
        (Some(GenericArgument::Type(inner)), None) => Some(inner),
        _ => None,
    }
}

pub(super) fn derive_query_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match _derive_query_record(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.write_errors().into(),
    }
}

fn _derive_query_record(input: DeriveInput) -> Result<proc_macro2::TokenStream, darling::Error> {
    if !matches!(
        &input.data,
        Data::Struct(DataStruct {
            fields: Fields::Named(_),
            ..
        })
    ) {
        return Err(darling::Error::custom(
            "`QueryRecord` can only be derived for structs with named fields.\n\
             Query parameters can only be decoded into a record: enums, unions, \
             tuple structs and unit structs are not supported.",
        )
        .with_span(&input.ident));
    }

    let input = QueryRecordInput::from_derive_input(&input)?;
    let struct_ident = &input.ident;
    let fields = input
        .data
        .take_struct()
        // This should never panic, since we reject unsupported shapes earlier on.
        .expect("`QueryRecord` only supports structs with named fields.");

    let descriptors = fields.iter().map(|field| {
        let field_ident = &field.ident;
        let name = field_ident.unraw().to_string();
        let ty_span = field.ty.span();

        let mut tags = quote! { ::parseq::Tags::new() };
        if let Some(query) = &field.query {
            tags = quote! { #tags.query(#query) };
        }
        if let Some(json) = &field.json {
            tags = quote! { #tags.json(#json) };
        }
        if let Some(parseq) = &field.parseq {
            tags = quote! { #tags.parseq(#parseq) };
        }

        let slot = if field.flatten {
            if single_type_argument(&field.ty, "Option").is_some() {
                quote_spanned! { ty_span =>
                    ::parseq::Slot::Embedded(::parseq::__private::embed_optional(&mut self.#field_ident))
                }
            } else {
                quote_spanned! { ty_span =>
                    ::parseq::Slot::Embedded(&mut self.#field_ident)
                }
            }
        } else {
            match Kind::of(&field.ty) {
                Kind::String => quote_spanned! { ty_span => ::parseq::Slot::String(&mut self.#field_ident) },
                Kind::Bool => quote_spanned! { ty_span => ::parseq::Slot::Bool(&mut self.#field_ident) },
                Kind::Signed => quote_spanned! { ty_span => ::parseq::Slot::Signed(&mut self.#field_ident) },
                Kind::Unsigned => quote_spanned! { ty_span => ::parseq::Slot::Unsigned(&mut self.#field_ident) },
                Kind::Array => quote_spanned! { ty_span => ::parseq::Slot::Array(&mut self.#field_ident) },
                Kind::Unsupported => quote! { ::parseq::Slot::Unsupported },
            }
        };

        quote! {
            ::parseq::Field::new(#name, #tags, #slot)
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::parseq::QueryRecord for #struct_ident #ty_generics #where_clause {
            fn fields(&mut self) -> ::std::vec::Vec<::parseq::Field<'_>> {
                ::std::vec![#(#descriptors),*]
            }
        }
    })
}
