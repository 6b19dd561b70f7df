// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! QR payload codec.
//!
//! A checkpoint's QR code carries a small JSON document identifying the
//! checkpoint. The codec contract is intentionally narrow: decoding an
//! encoded payload must round-trip the checkpoint id and the type tag.
//! Everything else is carried for offline display and forward
//! compatibility.
//!
//! Decoding is defensive: the payload is parsed as a JSON value first and
//! the required fields (`id`, `type`) are checked explicitly, so a missing
//! or mistyped field is a `MalformedQrCode` error rather than a best-effort
//! partial read. QR image rendering is an external concern; this module
//! only produces and consumes the transportable string.

use crate::error::DomainError;
use crate::types::Checkpoint;
use serde_json::{Map, Value};

/// The required type tag for checkpoint QR payloads.
pub const QR_PAYLOAD_TYPE: &str = "checkpoint";

/// A decoded checkpoint QR payload.
#[derive(Debug, Clone, PartialEq)]
pub struct QrPayload {
    /// The referenced checkpoint id (required).
    pub checkpoint_id: i64,
    /// The payload type tag (required, must be `"checkpoint"`).
    pub payload_type: String,
    /// The checkpoint name, carried for offline display.
    pub name: Option<String>,
    /// The geofence center latitude, carried for offline display.
    pub latitude: Option<f64>,
    /// The geofence center longitude, carried for offline display.
    pub longitude: Option<f64>,
    /// The owning station, carried for offline display.
    pub station_id: Option<i64>,
    /// Any additional fields present in the payload.
    pub extra: Map<String, Value>,
}

impl QrPayload {
    /// Builds the payload for a persisted checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CheckpointNotFound` if the checkpoint has no
    /// persisted id (an unpersisted checkpoint has no QR identity yet).
    pub fn for_checkpoint(checkpoint: &Checkpoint) -> Result<Self, DomainError> {
        let checkpoint_id: i64 = checkpoint
            .checkpoint_id
            .ok_or(DomainError::CheckpointNotFound(0))?;
        Ok(Self {
            checkpoint_id,
            payload_type: String::from(QR_PAYLOAD_TYPE),
            name: Some(checkpoint.name.clone()),
            latitude: Some(checkpoint.position.latitude()),
            longitude: Some(checkpoint.position.longitude()),
            station_id: Some(checkpoint.station_id),
            extra: Map::new(),
        })
    }

    /// Encodes this payload to its transportable string form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MalformedQrCode` if serialization fails.
    pub fn encode(&self) -> Result<String, DomainError> {
        let mut object: Map<String, Value> = self.extra.clone();
        object.insert(String::from("id"), Value::from(self.checkpoint_id));
        object.insert(
            String::from("type"),
            Value::String(self.payload_type.clone()),
        );
        if let Some(name) = &self.name {
            object.insert(String::from("name"), Value::String(name.clone()));
        }
        if let Some(latitude) = self.latitude {
            object.insert(String::from("latitude"), Value::from(latitude));
        }
        if let Some(longitude) = self.longitude {
            object.insert(String::from("longitude"), Value::from(longitude));
        }
        if let Some(station_id) = self.station_id {
            object.insert(String::from("station_id"), Value::from(station_id));
        }
        serde_json::to_string(&Value::Object(object)).map_err(|e| DomainError::MalformedQrCode {
            reason: format!("Failed to encode payload: {e}"),
        })
    }

    /// Decodes a transportable string into a checkpoint payload.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MalformedQrCode` if the string is not a JSON
    /// object, the `id` field is missing or not an integer, or the `type`
    /// field is missing or not `"checkpoint"`.
    pub fn decode(payload: &str) -> Result<Self, DomainError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| DomainError::MalformedQrCode {
                reason: format!("Payload is not valid JSON: {e}"),
            })?;

        let Value::Object(mut object) = value else {
            return Err(DomainError::MalformedQrCode {
                reason: String::from("Payload is not a JSON object"),
            });
        };

        let payload_type: String = match object.remove("type") {
            Some(Value::String(s)) => s,
            Some(_) => {
                return Err(DomainError::MalformedQrCode {
                    reason: String::from("Field 'type' is not a string"),
                });
            }
            None => {
                return Err(DomainError::MalformedQrCode {
                    reason: String::from("Field 'type' is missing"),
                });
            }
        };
        if payload_type != QR_PAYLOAD_TYPE {
            return Err(DomainError::MalformedQrCode {
                reason: format!("Unexpected payload type '{payload_type}'"),
            });
        }

        let checkpoint_id: i64 = match object.remove("id") {
            Some(Value::Number(n)) => n.as_i64().ok_or_else(|| DomainError::MalformedQrCode {
                reason: String::from("Field 'id' is not an integer"),
            })?,
            Some(_) => {
                return Err(DomainError::MalformedQrCode {
                    reason: String::from("Field 'id' is not an integer"),
                });
            }
            None => {
                return Err(DomainError::MalformedQrCode {
                    reason: String::from("Field 'id' is missing"),
                });
            }
        };

        let name: Option<String> = match object.remove("name") {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        let latitude: Option<f64> = object.remove("latitude").and_then(|v| v.as_f64());
        let longitude: Option<f64> = object.remove("longitude").and_then(|v| v.as_f64());
        let station_id: Option<i64> = object.remove("station_id").and_then(|v| v.as_i64());

        Ok(Self {
            checkpoint_id,
            payload_type,
            name,
            latitude,
            longitude,
            station_id,
            extra: object,
        })
    }
}
