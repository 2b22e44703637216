//! Template engine for the datagen emitters.
//!
//! A template is literal text interleaved with `{{function arg ...}}` actions.
//! Templates are parsed once against a [`FunctionLibrary`] and rendered many
//! times. Rendering never reads shared mutable state: everything a render call
//! may consult is passed in explicitly.
//!
//! # Architecture
//!
//! ```text
//!  template source
//!        │  Template::parse(name, source, &library)
//!        ▼
//! ┌─────────────────┐      ┌──────────────────────┐
//! │    Template     │◄─────│   FunctionLibrary    │
//! │  [Segment, ..]  │      │ name -> (check, fn)  │
//! └────────┬────────┘      └──────────────────────┘
//!          │  render(&mut RenderState, &RenderContext)
//!          ▼
//!       String
//! ```
//!
//! [`RenderState`] is owned by a single emitter (seeded RNG and record
//! index). [`RenderContext`] is built per pass and carries the locale, so two
//! emitters rendering concurrently cannot see each other's locale.
//!
//! # Example
//!
//! ```rust
//! use emit_template::{FunctionLibrary, RenderContext, RenderState, Template};
//!
//! let library = FunctionLibrary::standard();
//! let template = Template::parse("value", "user_{{index}}@{{digits 3}}", &library).unwrap();
//!
//! let mut state = RenderState::new(42);
//! let rendered = template.render(&mut state, &RenderContext::new("us")).unwrap();
//! assert!(rendered.starts_with("user_0@"));
//! ```
//!
//! # Functions
//!
//! - `index` - record index within the emitter
//! - `uuid` - UUID v4 drawn from the seeded RNG
//! - `digits N` - random N-digit number without a leading zero
//! - `integer MIN MAX` / `float MIN MAX` - random numbers in a closed range
//! - `bool` - random boolean
//! - `oneof "a" "b" ...` - random pick from the arguments
//! - `name`, `surname`, `email`, `city`, `country`, `locale` - locale-aware values
//! - `now`, `unix_time` - wall-clock timestamps
//! - `env "VAR"` - environment variable
//! - `key`, `value` - the record being formatted (output templates only)

pub mod error;
pub mod functions;
pub mod locale;
pub mod template;

// Re-exports for convenience
pub use error::{RenderError, TemplateError};
pub use functions::{Arg, FunctionLibrary};
pub use template::{RenderContext, RenderState, Template};
