//! `Serialize`/`Deserialize` for [`Bitmap64`], gated behind the `serde` feature.
//!
//! Delegates to [`Bitmap64::serialize_into`]/[`Bitmap64::deserialize_from`], encoded
//! as a byte sequence so the representation matches across self-describing (JSON)
//! and binary (bincode) formats.

use serde::de::{SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::bitmap::Bitmap64;

impl Serialize for Bitmap64 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf).map_err(serde::ser::Error::custom)?;
        serializer.serialize_bytes(&buf)
    }
}

impl<'de> Deserialize<'de> for Bitmap64 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BitmapVisitor;

        impl<'de> Visitor<'de> for BitmapVisitor {
            type Value = Bitmap64;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a serialized Bitmap64")
            }

            fn visit_bytes<E>(self, bytes: &[u8]) -> Result<Bitmap64, E>
            where
                E: serde::de::Error,
            {
                Bitmap64::deserialize_from(bytes).map_err(serde::de::Error::custom)
            }

            // Some formats (notably serde_json) serialize byte slices as a
            // sequence of integers rather than calling visit_bytes directly.
            fn visit_seq<A>(self, mut seq: A) -> Result<Bitmap64, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut bytes = Vec::new();
                while let Some(byte) = seq.next_element()? {
                    bytes.push(byte);
                }
                Bitmap64::deserialize_from(&bytes[..]).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_bytes(BitmapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json_and_bincode() {
        let mut bitmap = Bitmap64::new();
        bitmap.add_range(0, 5000).unwrap();
        bitmap.add(10_000_000_000);

        let json = serde_json::to_vec(&bitmap).unwrap();
        let from_json: Bitmap64 = serde_json::from_slice(&json).unwrap();
        assert_eq!(bitmap, from_json);

        let bin = bincode::serialize(&bitmap).unwrap();
        let from_bin: Bitmap64 = bincode::deserialize(&bin).unwrap();
        assert_eq!(bitmap, from_bin);
    }
}
