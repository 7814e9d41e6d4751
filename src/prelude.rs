pub use crate::{Error, Result, ZoneId};

pub use crate::aggregate::*;
pub use crate::bins::*;
pub use crate::engine::*;
pub use crate::geometry::*;
pub use crate::mask::*;
pub use crate::naming::*;
pub use crate::reader::*;
pub use crate::series::*;
pub use crate::stats::*;
pub use crate::table::*;
pub use crate::tiling::*;
