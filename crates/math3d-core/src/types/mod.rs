pub mod tag;
pub mod value;

pub use tag::LinearType;
pub use value::LinearValue;
