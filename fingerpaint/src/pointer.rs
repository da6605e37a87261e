use crate::{
    error::Result,
    graphics::{PixelPos, RawPoint},
    raster::RasterSurface,
    stroke::StrokePath,
    style::DrawStyle,
};
use indexmap::IndexMap;
use lyon::tessellation::StrokeTessellator;

pub type PointerId = u64;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerSession {
    pub path: StrokePath,
    pub last_point: RawPoint,
}

/// Open strokes, one per contact, in the order the contacts went down.
#[derive(Debug)]
pub struct PointerSessions {
    sessions: IndexMap<PointerId, PointerSession>,
    tolerance: f32,
}

impl Default for PointerSessions {
    fn default() -> Self {
        Self::new(crate::TOUCH_TOLERANCE)
    }
}

impl PointerSessions {
    pub fn new(tolerance: f32) -> Self {
        PointerSessions {
            sessions: IndexMap::new(),
            tolerance,
        }
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn get(&self, id: PointerId) -> Option<&PointerSession> {
        self.sessions.get(&id)
    }

    pub fn is_active(&self, id: PointerId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &StrokePath> {
        self.sessions.values().map(|session| &session.path)
    }

    /// A repeated start for a tracked pointer keeps its path and last point.
    pub fn begin(&mut self, id: PointerId, at: PixelPos) {
        if !at.is_finite() {
            tracing::trace!("pointer {id} started at non-finite {at}");
            return;
        }

        if self.sessions.contains_key(&id) {
            tracing::trace!("pointer {id} started again, keeping its stroke");
            return;
        }

        tracing::debug!("begin stroke {id} at {at}");
        let mut path = StrokePath::new();
        path.move_to(at);
        self.sessions.insert(
            id,
            PointerSession {
                path,
                last_point: RawPoint::from_pos(at),
            },
        );
    }

    /// Returns whether the sample extended the stroke.
    pub fn move_to(&mut self, id: PointerId, at: PixelPos) -> bool {
        let Some(session) = self.sessions.get_mut(&id) else {
            tracing::trace!("move for unknown pointer {id}");
            return false;
        };

        if !at.is_finite() {
            tracing::trace!("pointer {id} moved to non-finite {at}");
            return false;
        }

        if session.last_point.max_delta(at) < self.tolerance {
            tracing::trace!("pointer {id} moved less than {} to {at}", self.tolerance);
            return false;
        }

        let prev = PixelPos::from(session.last_point);
        session.path.quad_to(prev, prev.midpoint(at));
        session.last_point = RawPoint::from_pos(at);
        true
    }

    /// Bakes the stroke and forgets the pointer. Returns whether the pointer
    /// was tracked.
    pub fn end(
        &mut self,
        id: PointerId,
        raster: &mut RasterSurface,
        style: &DrawStyle,
        tessellator: &mut StrokeTessellator,
    ) -> Result<bool> {
        let Some(mut session) = self.sessions.shift_remove(&id) else {
            tracing::trace!("end for unknown pointer {id}");
            return Ok(false);
        };

        tracing::debug!(
            "commit stroke {id} with {} commands",
            session.path.commands().len()
        );
        let baked = raster.composite_stroke(&session.path, style, tessellator);
        session.path.reset();
        baked.map(|()| true)
    }

    /// Drops every open stroke without baking it.
    pub fn clear(&mut self) {
        self.sessions.clear();
    }
}
