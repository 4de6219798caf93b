//! Wire-level enumerations and flag bits

use mana_core::{Position, Vector2};

/// Error code carried by response messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Ok,
    ServerFull,
    AdministrativeLogoff,
    /// Any code without special meaning to the client
    Other(u8),
}

impl ErrorCode {
    pub const OK: u8 = 0;
    pub const SERVER_FULL: u8 = 8;
    pub const ADMINISTRATIVE_LOGOFF: u8 = 11;

    pub fn from_u8(value: u8) -> Self {
        match value {
            Self::OK => ErrorCode::Ok,
            Self::SERVER_FULL => ErrorCode::ServerFull,
            Self::ADMINISTRATIVE_LOGOFF => ErrorCode::AdministrativeLogoff,
            other => ErrorCode::Other(other),
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            ErrorCode::Ok => Self::OK,
            ErrorCode::ServerFull => Self::SERVER_FULL,
            ErrorCode::AdministrativeLogoff => Self::ADMINISTRATIVE_LOGOFF,
            ErrorCode::Other(code) => code,
        }
    }
}

/// Entity type tag of a BeingEnter message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Item = 0,
    Effect = 1,
    Npc = 2,
    Monster = 3,
    Character = 4,
}

impl EntityType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(EntityType::Item),
            1 => Some(EntityType::Effect),
            2 => Some(EntityType::Npc),
            3 => Some(EntityType::Monster),
            4 => Some(EntityType::Character),
            _ => None,
        }
    }
}

/// What a being is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BeingAction {
    #[default]
    Stand,
    Walk,
    Attack,
    Sit,
    Dead,
    Hurt,
}

impl BeingAction {
    /// Unknown action codes fall back to standing
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => BeingAction::Walk,
            2 => BeingAction::Attack,
            3 => BeingAction::Sit,
            4 => BeingAction::Dead,
            5 => BeingAction::Hurt,
            _ => BeingAction::Stand,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            BeingAction::Stand => 0,
            BeingAction::Walk => 1,
            BeingAction::Attack => 2,
            BeingAction::Sit => 3,
            BeingAction::Dead => 4,
            BeingAction::Hurt => 5,
        }
    }

    /// Parse the action name used in data files
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "stand" => Some(BeingAction::Stand),
            "walk" => Some(BeingAction::Walk),
            "attack" => Some(BeingAction::Attack),
            "sit" => Some(BeingAction::Sit),
            "dead" => Some(BeingAction::Dead),
            "hurt" => Some(BeingAction::Hurt),
            _ => None,
        }
    }
}

/// Facing direction, encoded as a bit each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BeingDirection {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl BeingDirection {
    /// Unknown direction codes fall back to facing down
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => BeingDirection::Up,
            4 => BeingDirection::Left,
            8 => BeingDirection::Right,
            _ => BeingDirection::Down,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            BeingDirection::Up => 1,
            BeingDirection::Down => 2,
            BeingDirection::Left => 4,
            BeingDirection::Right => 8,
        }
    }

    /// Direction that best matches a displacement; `None` for the null vector
    ///
    /// Horizontal wins when both axes have the same magnitude.
    pub fn from_vector(v: Vector2) -> Option<Self> {
        if v.is_null() {
            return None;
        }
        if v.x.abs() >= v.y.abs() {
            Some(if v.x < 0.0 { BeingDirection::Left } else { BeingDirection::Right })
        } else {
            Some(if v.y < 0.0 { BeingDirection::Up } else { BeingDirection::Down })
        }
    }

    /// Direction from one position toward another
    pub fn towards(from: Position, to: Position) -> Option<Self> {
        Self::from_vector(to - from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unspecified,
}

impl Gender {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Gender::Male,
            1 => Gender::Female,
            _ => Gender::Unspecified,
        }
    }
}

/// Quest progress as reported by the quest log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestState {
    #[default]
    Open,
    Started,
    Finished,
    Failed,
}

impl QuestState {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => QuestState::Started,
            2 => QuestState::Finished,
            3 => QuestState::Failed,
            _ => QuestState::Open,
        }
    }
}

/// BeingsMove: previous position follows
pub const MOVING_POSITION: u8 = 1;
/// BeingsMove: destination and speed follow
pub const MOVING_DESTINATION: u8 = 2;

/// QuestlogStatus: state byte follows
pub const QUESTLOG_UPDATE_STATE: u8 = 1;
/// QuestlogStatus: title string follows
pub const QUESTLOG_UPDATE_TITLE: u8 = 2;
/// QuestlogStatus: description string follows
pub const QUESTLOG_UPDATE_DESCRIPTION: u8 = 4;

/// Width of the credential token field
pub const TOKEN_LENGTH: usize = 32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorCode::from_u8(0), ErrorCode::Ok);
        assert_eq!(ErrorCode::from_u8(8), ErrorCode::ServerFull);
        assert_eq!(ErrorCode::from_u8(11), ErrorCode::AdministrativeLogoff);
        assert_eq!(ErrorCode::from_u8(3), ErrorCode::Other(3));
        assert_eq!(ErrorCode::Other(3).as_u8(), 3);
    }

    #[test]
    fn test_direction_from_vector() {
        assert_eq!(BeingDirection::from_vector(Vector2::new(3.0, 1.0)), Some(BeingDirection::Right));
        assert_eq!(BeingDirection::from_vector(Vector2::new(-1.0, 4.0)), Some(BeingDirection::Down));
        assert_eq!(BeingDirection::from_vector(Vector2::new(0.0, -2.0)), Some(BeingDirection::Up));
        assert_eq!(BeingDirection::from_vector(Vector2::new(-2.0, 2.0)), Some(BeingDirection::Left));
        assert_eq!(BeingDirection::from_vector(Vector2::ZERO), None);
    }

    #[test]
    fn test_action_codes() {
        assert_eq!(BeingAction::from_u8(4), BeingAction::Dead);
        assert_eq!(BeingAction::from_u8(200), BeingAction::Stand);
        assert_eq!(BeingAction::from_name("attack"), Some(BeingAction::Attack));
        assert_eq!(BeingAction::from_name("dance"), None);
    }
}
