use serde::{Deserialize, Serialize};

use crate::elements::{ElementsError, OrbitalElementVector, Satellite, ELEMENT_COUNT};

pub const JSONRPC_VERSION: &str = "2.0";

/// Remote methods the simulator exposes for satellite creation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Method {
    AddSatellite,
    AddSatellites,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest<P> {
    pub jsonrpc: String,
    pub method: String,
    pub id: u64,
    pub params: P,
}

impl<P> RpcRequest<P> {
    pub fn new(method: impl Into<String>, id: u64, params: P) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            id,
            params,
        }
    }
}

/// Params of `add_satellite`, and one entry of an `add_satellites` batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatellitePayload {
    pub id: String,
    pub elements: [f64; ELEMENT_COUNT],
}

impl From<&Satellite> for SatellitePayload {
    fn from(satellite: &Satellite) -> Self {
        Self {
            id: satellite.id.clone(),
            elements: satellite.elements.to_array(),
        }
    }
}

impl TryFrom<SatellitePayload> for Satellite {
    type Error = ElementsError;

    fn try_from(payload: SatellitePayload) -> Result<Self, Self::Error> {
        Ok(Satellite {
            id: payload.id,
            elements: OrbitalElementVector::from_array(payload.elements)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddSatellitesParams {
    pub satellites: Vec<SatellitePayload>,
}
