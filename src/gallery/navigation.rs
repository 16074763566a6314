use crate::store::Photo;
use uuid::Uuid;

/// Index-based position of one photo in the listed order. Navigation never
/// wraps: the first photo has no previous, the last no next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub total: usize,
}

impl Position {
    pub fn new(index: usize, total: usize) -> Option<Self> {
        (index < total).then_some(Self { index, total })
    }

    pub fn locate(photos: &[Photo], id: Uuid) -> Option<Self> {
        let index = photos.iter().position(|photo| photo.id == id)?;
        Self::new(index, photos.len())
    }

    pub fn previous(&self) -> Option<usize> {
        self.index.checked_sub(1)
    }

    pub fn next(&self) -> Option<usize> {
        let next = self.index + 1;
        (next < self.total).then_some(next)
    }

    pub fn has_previous(&self) -> bool {
        self.previous().is_some()
    }

    pub fn has_next(&self) -> bool {
        self.next().is_some()
    }

    /// One-based position for display, e.g. "3 of 12".
    pub fn label(&self) -> String {
        format!("{} of {}", self.index + 1, self.total)
    }
}

/// A photo together with its neighbours in the list.
#[derive(Debug)]
pub struct Neighbors<'a> {
    pub position: Position,
    pub current: &'a Photo,
    pub previous: Option<&'a Photo>,
    pub next: Option<&'a Photo>,
}

pub fn neighbors(photos: &[Photo], id: Uuid) -> Option<Neighbors<'_>> {
    let position = Position::locate(photos, id)?;
    Some(Neighbors {
        position,
        current: &photos[position.index],
        previous: position.previous().map(|i| &photos[i]),
        next: position.next().map(|i| &photos[i]),
    })
}
