//! Descriptor model for protocol buffer schemas, as handed to the brine-nano
//! Java generator by an upstream parser. Everything here is plain data: the
//! parser owns validation, the generator only reads.
//!
//! ```
//! use brine_nano_schema::*;
//!
//! let file = FileDescriptor {
//!     name: "geo/point.proto".to_owned(),
//!     package: "geo".to_owned(),
//!     message_types: vec![Descriptor {
//!         name: "Point".to_owned(),
//!         fields: vec![
//!             FieldDescriptor::new("x", 1, Label::Optional, FieldType::Float),
//!             FieldDescriptor::new("y", 2, Label::Optional, FieldType::Float),
//!         ],
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//!
//! let pool = DescriptorPool::new(vec![file]).unwrap();
//! let point = pool.scope(".geo.Point").unwrap();
//! assert_eq!(point.file, "geo/point.proto");
//! assert_eq!(pool.message(".geo.Point").unwrap().fields.len(), 2);
//! ```

pub mod descriptor;
pub mod pool;

pub use descriptor::*;
pub use pool::*;
