//! The layer store: the single active layer and its selection tickets.
//!
//! Selecting a layer issues a [`SelectionTicket`] with a monotonically
//! increasing id. The downloaded data is accepted only if its ticket is still
//! the current selection, so a slow response for an earlier selection can
//! never overwrite a newer one. Each accepted load replaces the layer whole.

use crate::error::QueryError;
use crate::types::{BoundingBox, Feature, FeatureCollection};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// An entry of the backend's layer catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl LayerInfo {
    /// Label used in the layer picker: `name [type]`.
    pub fn label(&self) -> String {
        format!("{} [{}]", self.name, self.kind)
    }
}

/// Where a raster layer's image lives and which region it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageryDescriptor {
    pub url: String,
    /// Two `[lat, lon]` corner pairs.
    pub bounds: [[f64; 2]; 2],
}

impl ImageryDescriptor {
    /// The covered region as a lon/lat box.
    pub fn extent(&self) -> BoundingBox {
        let [[lat_a, lon_a], [lat_b, lon_b]] = self.bounds;
        BoundingBox::new(lon_a, lat_a, lon_b, lat_b)
    }
}

/// Downloaded content of a layer.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerData {
    Vector(FeatureCollection),
    Raster(ImageryDescriptor),
}

impl LayerData {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Vector(_) => "vector",
            Self::Raster(_) => "raster",
        }
    }
}

/// Proof of a layer selection, handed back with the downloaded data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectionTicket {
    id: u64,
    name: String,
}

impl SelectionTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for SelectionTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}

#[derive(Debug, Clone)]
struct Selection {
    ticket: SelectionTicket,
    data: Option<LayerData>,
}

/// Holds at most one selected layer.
#[derive(Debug, Default)]
pub struct LayerStore {
    last_ticket: u64,
    selection: Option<Selection>,
}

impl LayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `name`, dropping whatever was loaded before.
    ///
    /// The layer is active immediately but has no data until
    /// [`fulfil`](Self::fulfil) is called with the returned ticket.
    pub fn select(&mut self, name: &str) -> SelectionTicket {
        self.last_ticket += 1;
        let ticket = SelectionTicket {
            id: self.last_ticket,
            name: name.to_string(),
        };
        debug!(ticket = %ticket, "layer selected");
        self.selection = Some(Selection {
            ticket: ticket.clone(),
            data: None,
        });
        ticket
    }

    /// Deselects the active layer. Outstanding tickets become stale.
    pub fn clear(&mut self) {
        self.selection = None;
    }

    /// Whether `ticket` still names the current selection.
    pub fn is_current(&self, ticket: &SelectionTicket) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|s| s.ticket == *ticket)
    }

    /// Stores downloaded data for `ticket`, replacing any previous data.
    pub fn fulfil(&mut self, ticket: &SelectionTicket, data: LayerData) -> Result<&LayerData, QueryError> {
        match self.selection.as_mut() {
            Some(selection) if selection.ticket == *ticket => Ok(&*selection.data.insert(data)),
            _ => {
                warn!(ticket = %ticket, "discarding stale layer response");
                Err(QueryError::StaleSelection {
                    name: ticket.name.clone(),
                    ticket: ticket.id,
                })
            }
        }
    }

    /// Name of the selected layer, loaded or not.
    pub fn active_name(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.ticket.name.as_str())
    }

    pub fn data(&self) -> Option<&LayerData> {
        self.selection.as_ref().and_then(|s| s.data.as_ref())
    }

    /// The active layer's features, or why there are none to query.
    pub fn features(&self) -> Result<&[Feature], QueryError> {
        let selection = self.selection.as_ref().ok_or(QueryError::NoActiveLayer)?;
        match &selection.data {
            Some(LayerData::Vector(collection)) => Ok(&collection.features),
            _ => Err(QueryError::NotVectorLayer(selection.ticket.name.clone())),
        }
    }
}
