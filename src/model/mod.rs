use std::{
    borrow::{Borrow, BorrowMut},
    hash::Hash,
};

pub mod container;
pub mod ids;
pub mod order;
pub mod product;
pub mod truck;

pub use container::{Container, ContainerMap};
pub use ids::{ContainerId, OrderId, ProductId, TruckId};
pub use order::Order;
pub use product::{Product, ProductMap};
pub use truck::{Truck, TruckMap};

pub trait Map<K, V>: BorrowMut<MapType<K, V>> + Into<MapType<K, V>>
where
    K: Eq + Ord + 'static,
    V: 'static,
{
    fn gets<Q>(&self, key: &Q) -> &V
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Hash + Eq + Ord,
    {
        self.borrow().get(key).expect("unchecked get failed")
    }

    fn gets_mut<Q>(&mut self, key: &Q) -> &mut V
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Hash + Eq + Ord,
    {
        self.borrow_mut()
            .get_mut(key)
            .expect("unchecked get_mut failed")
    }

    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Hash + Eq + Ord,
    {
        self.borrow().get(key)
    }

    fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Hash + Eq + Ord,
    {
        self.borrow_mut().get_mut(key)
    }

    fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.borrow().iter()
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> {
        self.borrow_mut().iter_mut()
    }

    fn keys(&self) -> impl Iterator<Item = &K> {
        self.borrow().keys()
    }

    fn values(&self) -> impl Iterator<Item = &V> {
        self.borrow().values()
    }

    fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.borrow_mut().values_mut()
    }

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Hash + Eq + Ord,
    {
        self.borrow().contains_key(key)
    }

    fn insert(&mut self, key: K, value: V) {
        self.borrow_mut().insert(key, value);
    }

    fn len(&self) -> usize {
        self.borrow().len()
    }

    fn is_empty(&self) -> bool {
        self.borrow().is_empty()
    }
}

pub type MapType<K, V> = std::collections::BTreeMap<K, V>;

/// Defines a newtype wrapper around `BTreeMap<K, V>`. Iteration order is
/// therefore always key order, never hash order — required by the
/// determinism guarantee every planning component depends on.
#[macro_export]
macro_rules! define_map {
    ($key:ty, $value:ty, $base:ident) => {
        #[derive(Debug, Default, Clone)]
        pub struct $base($crate::model::MapType<$key, $value>);

        impl std::borrow::Borrow<$crate::model::MapType<$key, $value>> for $base {
            fn borrow(&self) -> &$crate::model::MapType<$key, $value> {
                &self.0
            }
        }

        impl std::borrow::BorrowMut<$crate::model::MapType<$key, $value>> for $base {
            fn borrow_mut(&mut self) -> &mut $crate::model::MapType<$key, $value> {
                &mut self.0
            }
        }

        impl $crate::model::Map<$key, $value> for $base {}

        impl From<$crate::model::MapType<$key, $value>> for $base {
            fn from(map: $crate::model::MapType<$key, $value>) -> Self {
                Self(map)
            }
        }

        impl From<$base> for $crate::model::MapType<$key, $value> {
            fn from(base: $base) -> Self {
                base.0
            }
        }

        impl FromIterator<($key, $value)> for $base {
            fn from_iter<I: IntoIterator<Item = ($key, $value)>>(iter: I) -> Self {
                Self(iter.into_iter().collect())
            }
        }

        impl IntoIterator for $base {
            type Item = ($key, $value);
            type IntoIter =
                <$crate::model::MapType<$key, $value> as std::iter::IntoIterator>::IntoIter;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }
    };
}
