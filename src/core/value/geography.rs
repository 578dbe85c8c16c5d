//! 地理空间类型模块
//!
//! 线上的地理值是点、线、多边形三选一的联合体，坐标为 (x=经度, y=纬度)。

use serde::{Deserialize, Serialize};

/// 地理形状类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GeoShape {
    Point,
    LineString,
    Polygon,
}

/// 地理坐标
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_valid(&self) -> bool {
        self.x >= -180.0 && self.x <= 180.0 && self.y >= -90.0 && self.y <= 90.0
    }
}

/// 地理值
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Geography {
    Point(Coordinate),
    LineString(Vec<Coordinate>),
    /// 第一个环为外环，其余为洞
    Polygon(Vec<Vec<Coordinate>>),
}

impl Geography {
    pub fn shape(&self) -> GeoShape {
        match self {
            Geography::Point(_) => GeoShape::Point,
            Geography::LineString(_) => GeoShape::LineString,
            Geography::Polygon(_) => GeoShape::Polygon,
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Geography::Point(c) => c.is_valid(),
            Geography::LineString(coords) => {
                coords.len() >= 2 && coords.iter().all(Coordinate::is_valid)
            }
            Geography::Polygon(rings) => {
                !rings.is_empty()
                    && rings
                        .iter()
                        .all(|ring| ring.len() >= 4 && ring.iter().all(Coordinate::is_valid))
            }
        }
    }

    fn coords_wkt(coords: &[Coordinate]) -> String {
        coords
            .iter()
            .map(|c| format!("{} {}", c.x, c.y))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// WKT 格式输出
impl std::fmt::Display for Geography {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Geography::Point(c) => write!(f, "POINT({} {})", c.x, c.y),
            Geography::LineString(coords) => {
                write!(f, "LINESTRING({})", Self::coords_wkt(coords))
            }
            Geography::Polygon(rings) => {
                let rings: Vec<String> = rings
                    .iter()
                    .map(|ring| format!("({})", Self::coords_wkt(ring)))
                    .collect();
                write!(f, "POLYGON({})", rings.join(", "))
            }
        }
    }
}
