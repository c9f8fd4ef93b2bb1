//! Box-select gesture handling.
//!
//! The controller turns pointer events into a normalized [`BoundingBox`].
//! Each activation is one-shot: the gesture detaches itself on pointer-up and
//! must be activated again for the next box.
//!
//! ```text
//! Inactive --activate--> Armed --pointer_down--> Dragging --pointer_up--> Inactive
//! ```

use crate::error::QueryError;
use crate::render::PathStyle;
use crate::surface::{Cursor, MapSurface};
use crate::types::{BoundingBox, LonLat};
use tracing::{debug, trace};

/// Where the gesture currently is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    /// Not listening to pointer events.
    Inactive,
    /// Listening, waiting for the pointer to go down.
    Armed,
    /// Pointer is down at `anchor`; `drawn` is the rectangle currently shown.
    Dragging {
        anchor: LonLat,
        drawn: Option<BoundingBox>,
    },
}

/// Pointer-gesture state machine for drawing a selection rectangle.
#[derive(Debug, Clone)]
pub struct BoxSelectController {
    state: GestureState,
    style: PathStyle,
}

impl BoxSelectController {
    /// Creates an inactive controller drawing rectangles with `style`.
    pub fn new(style: PathStyle) -> Self {
        Self {
            state: GestureState::Inactive,
            style,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != GestureState::Inactive
    }

    /// Enters box-select mode.
    ///
    /// Refused with [`QueryError::NoActiveLayer`] when no layer is selected;
    /// a refusal leaves the state and the surface untouched.
    pub fn activate<S>(&mut self, layer_active: bool, surface: &mut S) -> Result<(), QueryError>
    where
        S: MapSurface + ?Sized,
    {
        if !layer_active {
            return Err(QueryError::NoActiveLayer);
        }
        surface.set_panning(false);
        surface.set_cursor(Cursor::Crosshair);
        surface.set_hint_visible(true);
        self.state = GestureState::Armed;
        debug!("box-select armed");
        Ok(())
    }

    /// Anchors a new rectangle, discarding any drawn one.
    pub fn pointer_down<S>(&mut self, at: LonLat, surface: &mut S)
    where
        S: MapSurface + ?Sized,
    {
        if self.state == GestureState::Inactive {
            return;
        }
        surface.remove_selection();
        self.state = GestureState::Dragging {
            anchor: at,
            drawn: None,
        };
    }

    /// Redraws the rectangle between the anchor and `at`.
    pub fn pointer_move<S>(&mut self, at: LonLat, surface: &mut S)
    where
        S: MapSurface + ?Sized,
    {
        if let GestureState::Dragging { anchor, drawn } = &mut self.state {
            let rect = BoundingBox::from_corners(*anchor, at);
            surface.draw_selection(&rect, &self.style);
            *drawn = Some(rect);
            trace!(%rect, "selection rectangle updated");
        }
    }

    /// Finishes the gesture and restores normal map interaction.
    ///
    /// Returns the selected box when a rectangle had been dragged out. A
    /// release without a drag, or without a preceding pointer-down, ends the
    /// gesture with no box.
    pub fn pointer_up<S>(&mut self, at: LonLat, surface: &mut S) -> Option<BoundingBox>
    where
        S: MapSurface + ?Sized,
    {
        let selected = match self.state {
            GestureState::Inactive => return None,
            GestureState::Armed => None,
            GestureState::Dragging { anchor, drawn } => {
                drawn.map(|_| BoundingBox::from_corners(anchor, at))
            }
        };

        surface.remove_selection();
        surface.set_panning(true);
        surface.set_cursor(Cursor::Default);
        surface.set_hint_visible(false);
        self.state = GestureState::Inactive;

        match &selected {
            Some(bbox) => debug!(%bbox, "box-select finished"),
            None => debug!("box-select finished without a rectangle"),
        }
        selected
    }
}
