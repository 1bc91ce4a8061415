//! 32-bit hotspot identifiers and the scene ids derived from them.
//! Hotspot ids are issued sequentially by the owning store; 0 is reserved as nil.
//! Scene ids are deterministic: the synthetic root scene is `main`, every other
//! scene is `scene_<hotspot id>`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Identifier of a hotspot record. Assigned at creation by the store,
/// immutable afterwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HotspotId(u32);

impl HotspotId {
    pub fn nil() -> Self {
        Self(0)
    }

    pub fn from_u32(value: u32) -> Self {
        Self(value)
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_nil(self) -> bool {
        self.0 == 0
    }

    pub fn parse_str(s: &str) -> Result<Self, String> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        u32::from_str_radix(s, 16)
            .map(Self)
            .map_err(|e| format!("Invalid HotspotId string: {}", e))
    }
}

impl Default for HotspotId {
    fn default() -> Self {
        Self::nil()
    }
}

impl fmt::Debug for HotspotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HotspotId({:08x})", self.0)
    }
}

impl fmt::Display for HotspotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl Serialize for HotspotId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:08x}", self.0))
    }
}

impl<'de> Deserialize<'de> for HotspotId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;
        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = HotspotId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("hex string or u32")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                HotspotId::parse_str(v).map_err(E::custom)
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                u32::try_from(v)
                    .map(HotspotId::from_u32)
                    .map_err(E::custom)
            }
        }
        deserializer.deserialize_any(Visitor)
    }
}

/// Identifier of a viewable scene. `Main` is the synthetic root scene;
/// every other scene belongs to the hotspot it was derived from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SceneId {
    Main,
    Hotspot(HotspotId),
}

impl SceneId {
    pub fn is_main(self) -> bool {
        matches!(self, SceneId::Main)
    }

    /// The hotspot this scene was derived from, if any.
    pub fn hotspot(self) -> Option<HotspotId> {
        match self {
            SceneId::Main => None,
            SceneId::Hotspot(id) => Some(id),
        }
    }
}

impl Default for SceneId {
    fn default() -> Self {
        SceneId::Main
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneId::Main => write!(f, "main"),
            SceneId::Hotspot(id) => write!(f, "scene_{}", id),
        }
    }
}

impl From<HotspotId> for SceneId {
    fn from(id: HotspotId) -> Self {
        SceneId::Hotspot(id)
    }
}

impl FromStr for SceneId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "main" {
            return Ok(SceneId::Main);
        }
        match s.strip_prefix("scene_") {
            Some(rest) => HotspotId::parse_str(rest).map(SceneId::Hotspot),
            None => Err(format!("Invalid SceneId string: {s:?}")),
        }
    }
}

impl Serialize for SceneId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SceneId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
