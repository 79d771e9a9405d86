use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};

use crate::math::{AxisBox, GridCoordinate};

#[derive(Debug, Deserialize, Serialize)]
struct AxisBoxSer {
    min: [GridCoordinate; 3],
    max: [GridCoordinate; 3],
}

impl Serialize for AxisBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        AxisBoxSer {
            min: self.min().to_array(),
            max: self.max().to_array(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AxisBox {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let AxisBoxSer { min, max } = AxisBoxSer::deserialize(deserializer)?;
        AxisBox::new(min, max).map_err(D::Error::custom)
    }
}
