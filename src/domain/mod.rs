//! Domain types shared by the validator engine and the component bridge

pub mod element;
pub mod errors;
pub mod value;

pub use element::{Element, Node};
pub use errors::{ComponentError, ConfigError, PropTypeError, PropTypesError};
pub use value::{
    json_stringify, Callback, ClassRef, Collection, InstanceRef, Iterable, PropMap, PropValue,
    Props, State, Symbol, TypeTag,
};
