//! 几何类型：边界矩形、坐标系选择
//!
//! `Rect` 使用 left/top/right/bottom 边界表示，libatspi 自身使用
//! `AtspiRect`（x/y/width/height）。两者之间的换算在此完成。

use super::error::GeometryError;
use super::ffi::{AtspiPoint, AtspiRect, ATSPI_COORD_TYPE_SCREEN, ATSPI_COORD_TYPE_WINDOW};
use serde::Serialize;
use std::ffi::c_int;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// 坐标系选择：相对屏幕或相对所在窗口
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordType {
    #[default]
    Screen = ATSPI_COORD_TYPE_SCREEN,
    Window = ATSPI_COORD_TYPE_WINDOW,
}

impl From<CoordType> for c_int {
    fn from(coord: CoordType) -> Self {
        coord as c_int
    }
}

impl FromStr for CoordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "screen" => Ok(CoordType::Screen),
            "window" => Ok(CoordType::Window),
            other => Err(format!("unknown coordinate type '{}', expected screen or window", other)),
        }
    }
}

/// 边界矩形
///
/// 不做规范化：数据异常时 right 可能小于 left，宽高随之为负。
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> i32 {
        self.right.wrapping_sub(self.left)
    }

    pub fn height(&self) -> i32 {
        self.bottom.wrapping_sub(self.top)
    }

    /// 中点，宽高减半按整数截断
    pub fn mid_point(&self) -> AtspiPoint {
        AtspiPoint {
            x: self.left.wrapping_add(self.width() / 2),
            y: self.top.wrapping_add(self.height() / 2),
        }
    }

    /// 按 `other` 的原点 (left, top) 反向平移，忽略其 right/bottom
    pub fn offset_from(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.wrapping_sub(other.left),
            top: self.top.wrapping_sub(other.top),
            right: self.right.wrapping_sub(other.left),
            bottom: self.bottom.wrapping_sub(other.top),
        }
    }

    /// 按 `other` 的原点 (left, top) 平移，忽略其 right/bottom
    pub fn offset_by(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.wrapping_add(other.left),
            top: self.top.wrapping_add(other.top),
            right: self.right.wrapping_add(other.left),
            bottom: self.bottom.wrapping_add(other.top),
        }
    }
}

impl From<AtspiRect> for Rect {
    fn from(r: AtspiRect) -> Self {
        Rect {
            left: r.x,
            top: r.y,
            right: r.x.wrapping_add(r.width),
            bottom: r.y.wrapping_add(r.height),
        }
    }
}

impl From<&AtspiRect> for Rect {
    fn from(r: &AtspiRect) -> Self {
        Rect::from(*r)
    }
}

/// 运行时参数列表构造：空列表得到零矩形，四个值依次为 left/top/right/bottom
impl TryFrom<&[i32]> for Rect {
    type Error = GeometryError;

    fn try_from(args: &[i32]) -> Result<Self, Self::Error> {
        match *args {
            [] => Ok(Rect::default()),
            [left, top, right, bottom] => Ok(Rect::new(left, top, right, bottom)),
            _ => Err(GeometryError::InvalidArgument(format!(
                "expected 0 or 4 edge values, got {}",
                args.len()
            ))),
        }
    }
}

/// 解析 `"l,t,r,b"`
impl FromStr for Rect {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Rect::default());
        }

        let values = trimmed
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<i32>()
                    .map_err(|e| GeometryError::InvalidArgument(format!("'{}': {}", part.trim(), e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Rect::try_from(values.as_slice())
    }
}

impl Sub for Rect {
    type Output = Rect;

    fn sub(self, other: Rect) -> Rect {
        self.offset_from(&other)
    }
}

impl Add for Rect {
    type Output = Rect;

    fn add(self, other: Rect) -> Rect {
        self.offset_by(&other)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(L{}, T{}, R{}, B{})", self.left, self.top, self.right, self.bottom)
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<RECT L{}, T{}, R{}, B{}>", self.left, self.top, self.right, self.bottom)
    }
}
