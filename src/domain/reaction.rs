use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionKind {
    Like,
    Deslike,
}

impl ReactionKind {
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "like" => Some(Self::Like),
            "deslike" => Some(Self::Deslike),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Deslike => "deslike",
        }
    }

    /// Counter deltas `(likes, deslikes)` for one row of this kind appearing.
    fn unit(&self) -> (i32, i32) {
        match self {
            Self::Like => (1, 0),
            Self::Deslike => (0, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionAction {
    Like,
    Deslike,
    RemoveLike,
    RemoveDeslike,
}

impl ReactionAction {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "like" => Some(Self::Like),
            "deslike" => Some(Self::Deslike),
            "removeLike" => Some(Self::RemoveLike),
            "removeDeslike" => Some(Self::RemoveDeslike),
            _ => None,
        }
    }
}

/// Why an action was refused given the current reaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    AlreadyLiked,
    AlreadyDisliked,
    NotLiked,
    NotDisliked,
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Self::AlreadyLiked => "you have already liked this post",
            Self::AlreadyDisliked => "you have already disliked this post",
            Self::NotLiked => "you have not liked this post",
            Self::NotDisliked => "you have not disliked this post",
        }
    }
}

/// Row mutation chosen for a (user, post) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Create(ReactionKind),
    /// Existing row changes type to the given kind.
    Flip(ReactionKind),
    /// Existing row of the given kind is deleted.
    Remove(ReactionKind),
}

impl Transition {
    /// Counter deltas `(likes, deslikes)` this transition applies to the post.
    pub fn counter_delta(&self) -> (i32, i32) {
        match self {
            Self::Create(kind) => kind.unit(),
            Self::Flip(to) => {
                let (likes, deslikes) = to.unit();
                (likes * 2 - 1, deslikes * 2 - 1)
            }
            Self::Remove(kind) => {
                let (likes, deslikes) = kind.unit();
                (-likes, -deslikes)
            }
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Create(ReactionKind::Like) => "post liked",
            Self::Create(ReactionKind::Deslike) => "post disliked",
            Self::Flip(ReactionKind::Like) => "dislike replaced with like",
            Self::Flip(ReactionKind::Deslike) => "like replaced with dislike",
            Self::Remove(ReactionKind::Like) => "like removed",
            Self::Remove(ReactionKind::Deslike) => "dislike removed",
        }
    }

    /// Reaction state of the pair once the transition is applied.
    pub fn resulting_kind(&self) -> Option<ReactionKind> {
        match self {
            Self::Create(kind) | Self::Flip(kind) => Some(*kind),
            Self::Remove(_) => None,
        }
    }
}

pub fn decide(
    existing: Option<ReactionKind>,
    action: ReactionAction,
) -> Result<Transition, Rejection> {
    use ReactionAction as A;
    use ReactionKind::{Deslike, Like};

    match (existing, action) {
        (None, A::Like) => Ok(Transition::Create(Like)),
        (None, A::Deslike) => Ok(Transition::Create(Deslike)),
        (Some(Like), A::Like) => Err(Rejection::AlreadyLiked),
        (Some(Like), A::Deslike) => Ok(Transition::Flip(Deslike)),
        (Some(Deslike), A::Like) => Ok(Transition::Flip(Like)),
        (Some(Deslike), A::Deslike) => Err(Rejection::AlreadyDisliked),
        (Some(Like), A::RemoveLike) => Ok(Transition::Remove(Like)),
        (Some(Deslike), A::RemoveDeslike) => Ok(Transition::Remove(Deslike)),
        (None | Some(Deslike), A::RemoveLike) => Err(Rejection::NotLiked),
        (None | Some(Like), A::RemoveDeslike) => Err(Rejection::NotDisliked),
    }
}

/// Validated body of a reaction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionRequest {
    pub user_id: Uuid,
    pub action: ReactionAction,
}

impl ReactionRequest {
    pub fn parse(user_id: Option<&str>, action: Option<&str>) -> Result<Self, &'static str> {
        let (Some(user_id), Some(action)) = (
            user_id.filter(|value| !value.is_empty()),
            action.filter(|value| !value.is_empty()),
        ) else {
            return Err("userId and action are required");
        };

        let action = ReactionAction::parse(action).ok_or(
            "invalid action, use 'like', 'deslike', 'removeLike' or 'removeDeslike'",
        )?;
        let user_id = Uuid::parse_str(user_id).map_err(|_| "userId must be a valid id")?;

        Ok(Self { user_id, action })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success {
        transition: Transition,
        numero_likes: i32,
        numero_deslikes: i32,
    },
    Rejected(Rejection),
    NotFound,
    InvalidArgument(&'static str),
}
