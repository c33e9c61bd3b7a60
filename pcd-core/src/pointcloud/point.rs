use serde::{Deserialize, Serialize};

// LAS data coordinates are stored as i32 and colors as u16 per channel.
// The working representation shifts the integers by offset / scale per axis
// and keeps only the high byte of each color channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawPointRecord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl RawPointRecord {
    pub fn new(xyz: [i32; 3], rgb: [u16; 3]) -> Self {
        Self {
            x: xyz[0],
            y: xyz[1],
            z: xyz[2],
            red: rgb[0],
            green: rgb[1],
            blue: rgb[2],
        }
    }

    pub fn xyz(&self) -> [i64; 3] {
        [self.x as i64, self.y as i64, self.z as i64]
    }

    pub fn rgb(&self) -> [u16; 3] {
        [self.red, self.green, self.blue]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkingPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl WorkingPoint {
    pub fn new(xyz: [f64; 3], rgb: [u8; 3]) -> Self {
        Self {
            x: xyz[0],
            y: xyz[1],
            z: xyz[2],
            red: rgb[0],
            green: rgb[1],
            blue: rgb[2],
        }
    }

    pub fn xyz(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn rgb(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

/// An owned snapshot of points, either as stored on disk or decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum PointSet {
    Raw(Vec<RawPointRecord>),
    Working(Vec<WorkingPoint>),
}

impl PointSet {
    pub fn len(&self) -> usize {
        match self {
            PointSet::Raw(points) => points.len(),
            PointSet::Working(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_transformed(&self) -> bool {
        matches!(self, PointSet::Working(_))
    }

    pub fn into_raw(self) -> Option<Vec<RawPointRecord>> {
        match self {
            PointSet::Raw(points) => Some(points),
            PointSet::Working(_) => None,
        }
    }

    pub fn into_working(self) -> Option<Vec<WorkingPoint>> {
        match self {
            PointSet::Working(points) => Some(points),
            PointSet::Raw(_) => None,
        }
    }
}
