//! Linux AT-SPI 无障碍 API 绑定层
//!
//! 运行时定位并加载 libatspi，按固定签名表绑定原生函数，
//! 并提供查询元素位置/尺寸所需的几何类型。
//!
//! # 使用示例
//!
//! ```rust,no_run
//! use atspi_bind::atspi::{AtspiFunctions, CoordType};
//!
//! let atspi = AtspiFunctions::load()?;
//! if let Some(desktop) = atspi.desktop(0) {
//!     println!("Desktop: {:?}", atspi.name(desktop, None));
//!     for i in 0..atspi.child_count(desktop, None) {
//!         let Some(app) = atspi.child_at_index(desktop, i, None) else { continue };
//!         if let Some(comp) = atspi.component(app) {
//!             println!("{:?}", atspi.rectangle(comp, CoordType::Screen, None));
//!         }
//!     }
//! }
//! # Ok::<(), atspi_bind::atspi::AtspiError>(())
//! ```

mod discovery;
mod error;
mod functions;
mod geometry;
mod types;

pub mod ffi;


// 公开导出
pub use discovery::{find_library, parse_cache_listing, Discovery, DEFAULT_LIB_NAME, LDCONFIG, LIB_TOKEN};
pub use error::{AtspiError, AtspiResult, GeometryError, LoadFailure};
pub use ffi::{AtspiPoint, AtspiRect};
pub use functions::{AtspiFunctions, BOUND_SYMBOLS};
pub use geometry::{CoordType, Rect};
pub use types::{Accessible, Component, ErrorSlot};
