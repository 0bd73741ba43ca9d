use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;

use anyhow::Result;

/// Typed value storage connecting the stages of one simulation request.
///
/// Values are keyed by their concrete type: the fidelity stage publishes an
/// `ActiveFidelity`, the thermal stage a `TemperatureGrid`, and so on. A new
/// payload type needs no change here.
#[derive(Default)]
pub struct Bus {
    values: HashMap<TypeId, Box<dyn Any>>,
}

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the stored value of type `T`.
    pub fn put<T: 'static>(&mut self, value: T) {
        self.values.insert(TypeId::of::<T>(), Box::new(value));
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    /// Like [`Bus::get`], but a missing value is an error naming the type.
    ///
    /// Used by stages whose upstream stage is mandatory.
    pub fn require<T: 'static>(&self) -> Result<&T> {
        self.get::<T>()
            .ok_or_else(|| anyhow::anyhow!("bus has no value of type `{}`", type_name::<T>()))
    }

    /// Removes and returns the stored value of type `T`, if present.
    pub fn take<T: 'static>(&mut self) -> Option<T> {
        self.values
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast::<T>().ok())
            .map(|b| *b)
    }
}
