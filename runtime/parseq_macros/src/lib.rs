use proc_macro::TokenStream;

mod query_record;

#[proc_macro_derive(QueryRecord, attributes(query, json, parseq))]
pub fn derive_query_record(input: TokenStream) -> TokenStream {
    query_record::derive_query_record(input)
}
