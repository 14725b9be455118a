//! One submodule per keyword group, exactly as grouped in spec §4.4.

pub mod annotation;
pub mod array_kw;
pub mod combinators;
pub mod numeric;
pub mod object_kw;
pub mod string_kw;
pub mod value_kw;
