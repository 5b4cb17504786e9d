pub mod frame;
pub mod schema;
pub mod value;

// re-export for cleaner imports
pub use self::frame::{Column, Frame};
pub use self::schema::{JoinConfig, JoinHow, OutputLayout, ResolvedSchema};
pub use self::value::Value;
