/// Current vote cast on a card. A card holds at most one vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoteDirection {
    #[default]
    None,
    Up,
    Down,
}

impl VoteDirection {
    /// Contribution of this vote to the displayed count.
    pub fn weight(&self) -> i64 {
        match self {
            Self::None => 0,
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    Up,
    Down,
}

/// Ephemeral per-card vote state. Nothing is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteCounter {
    direction: VoteDirection,
    count: i64,
}

impl VoteCounter {
    pub fn new(initial: i64) -> Self {
        Self {
            direction: VoteDirection::None,
            count: initial,
        }
    }

    pub fn direction(&self) -> VoteDirection {
        self.direction
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn up(&mut self) {
        self.apply(VoteAction::Up);
    }

    pub fn down(&mut self) {
        self.apply(VoteAction::Down);
    }

    /// Clicking the active direction clears the vote; clicking the other one
    /// switches it. The count moves by the difference in weights, so switching
    /// sides moves it by two.
    pub fn apply(&mut self, action: VoteAction) {
        let next = match (self.direction, action) {
            (VoteDirection::Up, VoteAction::Up) | (VoteDirection::Down, VoteAction::Down) => {
                VoteDirection::None
            }
            (_, VoteAction::Up) => VoteDirection::Up,
            (_, VoteAction::Down) => VoteDirection::Down,
        };
        self.count += next.weight() - self.direction.weight();
        self.direction = next;
    }
}

impl Default for VoteCounter {
    fn default() -> Self {
        Self::new(0)
    }
}
