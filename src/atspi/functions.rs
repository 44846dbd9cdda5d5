//! libatspi 运行时绑定
//!
//! 构造时一次性完成：定位库文件、打开、按签名表解析全部符号。
//! 任一步骤失败都返回单一的 `AtspiError::NotInstalled`，不存在部分可用的绑定。
//! 构造完成后函数表只读，可在线程间共享；libatspi 自身的线程安全约束由调用方负责。

use super::discovery::Discovery;
use super::error::{AtspiResult, LoadFailure};
use super::ffi::*;
use super::geometry::{CoordType, Rect};
use super::types::{error_out, Accessible, Component, ErrorSlot};
use libloading::Library;
use std::ffi::{c_char, CStr};
use tracing::{debug, info};

/// 已绑定的 libatspi 函数表
///
/// 函数指针字段与原生符号一一对应，签名见 [`super::ffi`]。
/// 直接调用字段需要 `unsafe`；同名的安全方法负责句柄与返回值的转换，
/// 并在复制出返回值后用 `g_free` 释放原生内存。直接调用 `get_*` 字段时由调用方释放。
pub struct AtspiFunctions {
    pub get_desktop: GetDesktopFn,
    pub get_name: GetNameFn,
    pub get_id: GetIdFn,
    pub get_process_id: GetProcessIdFn,
    pub get_role_name: GetRoleNameFn,
    pub get_parent: GetParentFn,
    pub get_child_count: GetChildCountFn,
    pub get_child_at_index: GetChildAtIndexFn,
    pub get_component: GetComponentFn,
    pub get_position: GetPositionFn,
    pub get_size: GetSizeFn,
    pub get_rectangle: GetExtentsFn,
    pub g_free: GFreeFn,
    pub g_clear_error: GClearErrorFn,

    path: String,
    // 函数指针借用自该库，必须与之同生命周期
    _library: Library,
}

/// 签名表中的符号数量
pub const BOUND_SYMBOLS: usize = 14;

impl AtspiFunctions {
    /// 通过默认的共享库缓存查找加载 libatspi
    pub fn load() -> AtspiResult<Self> {
        Self::discover(&Discovery::default())
    }

    /// 按指定查找参数加载
    pub fn discover(discovery: &Discovery) -> AtspiResult<Self> {
        let path = discovery.resolve()?;
        Self::open(&path)
    }

    /// 从指定路径或文件名加载并绑定全部符号
    pub fn open(path: &str) -> AtspiResult<Self> {
        debug!("Opening {}", path);

        let library = unsafe { Library::new(path) }.map_err(|e| LoadFailure::Open {
            path: path.to_string(),
            source: e,
        })?;

        let functions = unsafe {
            Self {
                get_desktop: bind(&library, path, SYM_GET_DESKTOP)?,
                get_name: bind(&library, path, SYM_GET_NAME)?,
                get_id: bind(&library, path, SYM_GET_ID)?,
                get_process_id: bind(&library, path, SYM_GET_PROCESS_ID)?,
                get_role_name: bind(&library, path, SYM_GET_ROLE_NAME)?,
                get_parent: bind(&library, path, SYM_GET_PARENT)?,
                get_child_count: bind(&library, path, SYM_GET_CHILD_COUNT)?,
                get_child_at_index: bind(&library, path, SYM_GET_CHILD_AT_INDEX)?,
                get_component: bind(&library, path, SYM_GET_COMPONENT)?,
                get_position: bind(&library, path, SYM_GET_POSITION)?,
                get_size: bind(&library, path, SYM_GET_SIZE)?,
                get_rectangle: bind(&library, path, SYM_GET_EXTENTS)?,
                g_free: bind(&library, path, SYM_G_FREE)?,
                g_clear_error: bind(&library, path, SYM_G_CLEAR_ERROR)?,
                path: path.to_string(),
                _library: library,
            }
        };

        info!("Loaded {} ({} symbols bound)", path, BOUND_SYMBOLS);
        Ok(functions)
    }

    /// 实际加载的库路径
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 第 `index` 个桌面（无障碍树根）
    pub fn desktop(&self, index: i32) -> Option<Accessible> {
        unsafe { Accessible::from_raw((self.get_desktop)(index)) }
    }

    pub fn name(&self, obj: Accessible, error: Option<&mut ErrorSlot>) -> Option<String> {
        unsafe { copy_string((self.get_name)(obj.as_ptr(), error_out(error)), self.g_free) }
    }

    pub fn id(&self, obj: Accessible, error: Option<&mut ErrorSlot>) -> i32 {
        unsafe { (self.get_id)(obj.as_ptr(), error_out(error)) }
    }

    pub fn process_id(&self, obj: Accessible, error: Option<&mut ErrorSlot>) -> u32 {
        unsafe { (self.get_process_id)(obj.as_ptr(), error_out(error)) }
    }

    pub fn role_name(&self, obj: Accessible, error: Option<&mut ErrorSlot>) -> Option<String> {
        unsafe { copy_string((self.get_role_name)(obj.as_ptr(), error_out(error)), self.g_free) }
    }

    pub fn parent(&self, obj: Accessible, error: Option<&mut ErrorSlot>) -> Option<Accessible> {
        unsafe { Accessible::from_raw((self.get_parent)(obj.as_ptr(), error_out(error))) }
    }

    /// 子元素数量，出错时 libatspi 返回 -1
    pub fn child_count(&self, obj: Accessible, error: Option<&mut ErrorSlot>) -> i32 {
        unsafe { (self.get_child_count)(obj.as_ptr(), error_out(error)) }
    }

    pub fn child_at_index(
        &self,
        obj: Accessible,
        index: i32,
        error: Option<&mut ErrorSlot>,
    ) -> Option<Accessible> {
        unsafe {
            Accessible::from_raw((self.get_child_at_index)(obj.as_ptr(), index, error_out(error)))
        }
    }

    /// 元素的 Component 接口，不支持时为 None
    pub fn component(&self, obj: Accessible) -> Option<Component> {
        unsafe { Component::from_raw((self.get_component)(obj.as_ptr())) }
    }

    pub fn position(
        &self,
        comp: Component,
        coords: CoordType,
        error: Option<&mut ErrorSlot>,
    ) -> Option<AtspiPoint> {
        unsafe {
            let ptr = (self.get_position)(comp.as_ptr(), coords.into(), error_out(error));
            copy_value(ptr, self.g_free)
        }
    }

    /// 尺寸，以 (宽, 高) 形式放在 `AtspiPoint` 中返回
    pub fn size(&self, comp: Component, error: Option<&mut ErrorSlot>) -> Option<AtspiPoint> {
        unsafe { copy_value((self.get_size)(comp.as_ptr(), error_out(error)), self.g_free) }
    }

    pub fn extents(
        &self,
        comp: Component,
        coords: CoordType,
        error: Option<&mut ErrorSlot>,
    ) -> Option<AtspiRect> {
        unsafe {
            let ptr = (self.get_rectangle)(comp.as_ptr(), coords.into(), error_out(error));
            copy_value(ptr, self.g_free)
        }
    }

    /// 边界形式的外接矩形
    pub fn rectangle(
        &self,
        comp: Component,
        coords: CoordType,
        error: Option<&mut ErrorSlot>,
    ) -> Option<Rect> {
        self.extents(comp, coords, error).map(Rect::from)
    }

    /// 释放槽位中的 `GError` 并清空，槽位可再次用于下一次调用
    pub fn clear_error(&self, slot: &mut ErrorSlot) {
        unsafe { slot.clear_with(self.g_clear_error) }
    }
}

impl std::fmt::Debug for AtspiFunctions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtspiFunctions").field("path", &self.path).finish_non_exhaustive()
    }
}

/// 按声明的签名类型解析符号，复制出函数指针
unsafe fn bind<T: Copy>(library: &Library, path: &str, symbol: &'static str) -> Result<T, LoadFailure> {
    library
        .get::<T>(symbol.as_bytes())
        .map(|sym| *sym)
        .map_err(|e| LoadFailure::Symbol {
            symbol,
            path: path.to_string(),
            source: e,
        })
}

/// 复制原生字符串后用 `free` 释放原缓冲区
pub(super) unsafe fn copy_string(ptr: *mut c_char, free: GFreeFn) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let copied = CStr::from_ptr(ptr).to_string_lossy().into_owned();
    free(ptr.cast());
    Some(copied)
}

/// 复制原生返回的结构体值后用 `free` 释放原内存
pub(super) unsafe fn copy_value<T: Copy>(ptr: *mut T, free: GFreeFn) -> Option<T> {
    if ptr.is_null() {
        return None;
    }
    let value = ptr.read();
    free(ptr.cast());
    Some(value)
}
