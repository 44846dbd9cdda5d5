//! libatspi 原生 ABI 声明
//!
//! 结构体布局与函数签名必须与 C 头文件 `atspi.h` 完全一致，
//! 参数顺序、指针/值传递、返回类型任何偏差都会破坏调用栈。
//! 此模块仅声明类型，符号在运行时由 `functions` 模块解析。

use std::ffi::{c_char, c_int, c_uint, c_void};
use std::marker::{PhantomData, PhantomPinned};

/// 屏幕坐标
pub const ATSPI_COORD_TYPE_SCREEN: c_int = 0;
/// 窗口坐标
pub const ATSPI_COORD_TYPE_WINDOW: c_int = 1;

/// `AtspiRect`：原点 + 宽高
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AtspiRect {
    pub x: c_int,
    pub y: c_int,
    pub width: c_int,
    pub height: c_int,
}

/// `AtspiPoint`：位置查询返回坐标，尺寸查询返回 (宽, 高)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AtspiPoint {
    pub x: c_int,
    pub y: c_int,
}

/// 不透明类型：内部布局由 libatspi 定义，只能通过指针传递
#[repr(C)]
pub struct AtspiAccessible {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

#[repr(C)]
pub struct AtspiComponent {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

#[repr(C)]
pub struct GError {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

// 函数签名表

pub type GetDesktopFn = unsafe extern "C" fn(i: c_int) -> *mut AtspiAccessible;

pub type GetNameFn =
    unsafe extern "C" fn(obj: *mut AtspiAccessible, error: *mut *mut GError) -> *mut c_char;

pub type GetIdFn = unsafe extern "C" fn(obj: *mut AtspiAccessible, error: *mut *mut GError) -> c_int;

pub type GetProcessIdFn =
    unsafe extern "C" fn(obj: *mut AtspiAccessible, error: *mut *mut GError) -> c_uint;

pub type GetRoleNameFn =
    unsafe extern "C" fn(obj: *mut AtspiAccessible, error: *mut *mut GError) -> *mut c_char;

pub type GetParentFn =
    unsafe extern "C" fn(obj: *mut AtspiAccessible, error: *mut *mut GError) -> *mut AtspiAccessible;

pub type GetChildCountFn =
    unsafe extern "C" fn(obj: *mut AtspiAccessible, error: *mut *mut GError) -> c_int;

pub type GetChildAtIndexFn = unsafe extern "C" fn(
    obj: *mut AtspiAccessible,
    child_index: c_int,
    error: *mut *mut GError,
) -> *mut AtspiAccessible;

pub type GetComponentFn = unsafe extern "C" fn(obj: *mut AtspiAccessible) -> *mut AtspiComponent;

pub type GetPositionFn = unsafe extern "C" fn(
    obj: *mut AtspiComponent,
    ctype: c_int,
    error: *mut *mut GError,
) -> *mut AtspiPoint;

pub type GetSizeFn =
    unsafe extern "C" fn(obj: *mut AtspiComponent, error: *mut *mut GError) -> *mut AtspiPoint;

pub type GetExtentsFn = unsafe extern "C" fn(
    obj: *mut AtspiComponent,
    ctype: c_int,
    error: *mut *mut GError,
) -> *mut AtspiRect;

// GLib 内存释放：字符串与 AtspiPoint / AtspiRect 均以 transfer-full 返回

pub type GFreeFn = unsafe extern "C" fn(mem: *mut c_void);

pub type GClearErrorFn = unsafe extern "C" fn(err: *mut *mut GError);

// 导出符号名

pub const SYM_GET_DESKTOP: &str = "atspi_get_desktop";
pub const SYM_GET_NAME: &str = "atspi_accessible_get_name";
pub const SYM_GET_ID: &str = "atspi_accessible_get_id";
pub const SYM_GET_PROCESS_ID: &str = "atspi_accessible_get_process_id";
pub const SYM_GET_ROLE_NAME: &str = "atspi_accessible_get_role_name";
pub const SYM_GET_PARENT: &str = "atspi_accessible_get_parent";
pub const SYM_GET_CHILD_COUNT: &str = "atspi_accessible_get_child_count";
pub const SYM_GET_CHILD_AT_INDEX: &str = "atspi_accessible_get_child_at_index";
pub const SYM_GET_COMPONENT: &str = "atspi_accessible_get_component";
pub const SYM_GET_POSITION: &str = "atspi_component_get_position";
pub const SYM_GET_SIZE: &str = "atspi_component_get_size";
pub const SYM_GET_EXTENTS: &str = "atspi_component_get_extents";

// 由 libatspi 依赖的 libglib 导出，经同一库句柄解析
pub const SYM_G_FREE: &str = "g_free";
pub const SYM_G_CLEAR_ERROR: &str = "g_clear_error";
