mod column;
mod connection;
mod driver;
mod entity;
mod error;
mod repository;
mod row;
mod sql_writer;
mod table_ref;
mod util;
mod value;

pub use column::*;
pub use connection::*;
pub use driver::*;
pub use entity::*;
pub use error::*;
pub use repository::*;
pub use row::*;
pub use sql_writer::*;
pub use table_ref::*;
pub use util::*;
pub use value::*;
