//! Row records, dynamic values and typed admin entities

mod admin;
mod id;
mod record;
mod value;

pub use admin::*;
pub use id::Id;
pub use record::Record;
pub use value::Value;
