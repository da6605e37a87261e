use crate::{graphics::PixelPos, pointer::PointerId};

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub id: PointerId,
    pub phase: TouchPhase,
    pub location: PixelPos,
}

impl Touch {
    pub fn new(id: PointerId, phase: TouchPhase, x: f32, y: f32) -> Self {
        Touch {
            id,
            phase,
            location: PixelPos { x, y },
        }
    }

    pub fn start(id: PointerId, x: f32, y: f32) -> Self {
        Self::new(id, TouchPhase::Start, x, y)
    }

    pub fn moved(id: PointerId, x: f32, y: f32) -> Self {
        Self::new(id, TouchPhase::Move, x, y)
    }

    pub fn end(id: PointerId, x: f32, y: f32) -> Self {
        Self::new(id, TouchPhase::End, x, y)
    }
}

/// Everything the host delivered at once, possibly several contacts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerEvent {
    pub touches: Vec<Touch>,
}

impl PointerEvent {
    pub fn new(touches: Vec<Touch>) -> Self {
        PointerEvent { touches }
    }
}

impl From<Touch> for PointerEvent {
    fn from(touch: Touch) -> Self {
        PointerEvent {
            touches: vec![touch],
        }
    }
}

impl FromIterator<Touch> for PointerEvent {
    fn from_iter<I: IntoIterator<Item = Touch>>(iter: I) -> Self {
        PointerEvent {
            touches: iter.into_iter().collect(),
        }
    }
}
