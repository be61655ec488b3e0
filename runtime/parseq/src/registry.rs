use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::errors::TypeError;
use crate::record::QueryRecord;

type Accessor = for<'a> fn(&'a mut dyn Any) -> Option<&'a mut dyn QueryRecord>;

/// The set of record types that can be decoded through a type-erased destination.
///
/// See [`Decoder::decode_dyn`](crate::Decoder::decode_dyn).
///
/// # Example
///
/// ```rust
/// use parseq::{QueryRecord, Registry};
///
/// #[derive(Default, QueryRecord)]
/// pub struct Home {
///     home_id: u32,
/// }
///
/// let mut registry = Registry::new();
/// registry.register::<Home>();
/// assert!(registry.contains::<Home>());
/// assert!(!registry.contains::<u32>());
/// ```
#[derive(Default, Clone)]
pub struct Registry {
    accessors: HashMap<TypeId, Accessor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` as a record type. Registering the same type twice is a no-op.
    pub fn register<T>(&mut self) -> &mut Self
    where
        T: QueryRecord + Any,
    {
        self.accessors.insert(TypeId::of::<T>(), access::<T>);
        self
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.accessors.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    /// View `destination` as a record, if its concrete type was registered.
    pub(crate) fn view<'a>(
        &self,
        destination: &'a mut dyn Any,
    ) -> Result<&'a mut dyn QueryRecord, TypeError> {
        let type_id = (*destination).type_id();
        self.accessors
            .get(&type_id)
            .and_then(|access| access(destination))
            .ok_or(TypeError { type_id })
    }
}

fn access<T: QueryRecord + Any>(destination: &mut dyn Any) -> Option<&mut dyn QueryRecord> {
    destination
        .downcast_mut::<T>()
        .map(|record| record as &mut dyn QueryRecord)
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("records", &self.accessors.len())
            .finish()
    }
}
