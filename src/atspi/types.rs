//! 原生句柄的类型化包装
//!
//! 句柄指向 libatspi 拥有的内存，本层从不分配、复制或释放它们，
//! 只负责在调用之间传递指针。不同句柄类型之间无法混用。

use super::ffi::{AtspiAccessible, AtspiComponent, GClearErrorFn, GError};
use std::ptr::{self, NonNull};

/// AtspiAccessible 句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Accessible(NonNull<AtspiAccessible>);

impl Accessible {
    /// 从裸指针创建，空指针返回 None
    ///
    /// # Safety
    /// 非空时指针必须指向 libatspi 返回的有效对象，且在句柄使用期间保持有效。
    pub unsafe fn from_raw(ptr: *mut AtspiAccessible) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    /// 获取内部裸指针
    pub fn as_ptr(&self) -> *mut AtspiAccessible {
        self.0.as_ptr()
    }
}

/// AtspiComponent 句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Component(NonNull<AtspiComponent>);

impl Component {
    /// # Safety
    /// 同 [`Accessible::from_raw`]。
    pub unsafe fn from_raw(ptr: *mut AtspiComponent) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(&self) -> *mut AtspiComponent {
        self.0.as_ptr()
    }
}

/// 原生错误输出槽（`GError **`）
///
/// 初始为空；调用失败时由 libatspi 写入。内容不在本层解释。
/// 同一个槽位复用于下一次调用前必须先清空，见 `AtspiFunctions::clear_error`。
#[derive(Debug)]
pub struct ErrorSlot(*mut GError);

impl ErrorSlot {
    pub fn new() -> Self {
        Self(ptr::null_mut())
    }

    /// 是否已写入错误
    pub fn is_set(&self) -> bool {
        !self.0.is_null()
    }

    /// 已写入的原生错误指针
    pub fn get(&self) -> Option<NonNull<GError>> {
        NonNull::new(self.0)
    }

    /// 重置为空，不释放原有内容
    pub fn clear(&mut self) {
        self.0 = ptr::null_mut();
    }

    /// 用原生的 `g_clear_error` 释放并清空
    ///
    /// # Safety
    /// `clear` 必须符合 `g_clear_error` 的语义，槽位内容必须来自 libatspi。
    pub(crate) unsafe fn clear_with(&mut self, clear: GClearErrorFn) {
        if self.is_set() {
            clear(self.as_out_ptr());
        }
    }

    pub(crate) fn as_out_ptr(&mut self) -> *mut *mut GError {
        &mut self.0
    }
}

impl Default for ErrorSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// 把可选的错误槽转换为原生参数，None 传空指针表示不关心错误
pub(crate) fn error_out(slot: Option<&mut ErrorSlot>) -> *mut *mut GError {
    match slot {
        Some(slot) => slot.as_out_ptr(),
        None => ptr::null_mut(),
    }
}
