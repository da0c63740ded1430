use crate::domain::types::{ChallengeKind, Player};

pub const PLAYERS: usize = 2;
pub const MAX_ROUNDS: u8 = 20;
pub const ROUNDS_PER_PLAYER: u8 = MAX_ROUNDS / 2;
pub const MAX_SAME_IN_ROW: u8 = 3;
pub const MAX_TURN_ORDER_ATTEMPTS: u32 = 10_000;

/// Rounds each player plays of each challenge, in `ChallengeKind::ALL` order.
pub const PER_PLAYER_QUOTAS: [u8; 4] = [2, 3, 3, 2];

pub const TUTORIAL_MISSIONS: u8 = 4;
pub const TUTORIAL_ROUNDS: u8 = 8;

pub const TUTORIAL_TURN_ORDER: [Player; TUTORIAL_ROUNDS as usize] = [
    Player::One,
    Player::Two,
    Player::One,
    Player::Two,
    Player::One,
    Player::Two,
    Player::One,
    Player::Two,
];

pub const TUTORIAL_CHALLENGES: [ChallengeKind; TUTORIAL_ROUNDS as usize] = [
    ChallengeKind::Stroop,
    ChallengeKind::Stroop,
    ChallengeKind::SpeedGrid,
    ChallengeKind::SpeedGrid,
    ChallengeKind::Equation,
    ChallengeKind::Equation,
    ChallengeKind::GoNoGo,
    ChallengeKind::GoNoGo,
];

/// Challenge taught by a 1-based tutorial mission.
pub fn mission_challenge(mission: u8) -> Option<ChallengeKind> {
    if mission == 0 || mission > TUTORIAL_MISSIONS {
        return None;
    }
    Some(ChallengeKind::ALL[(mission - 1) as usize])
}

/// Player who tries a 1-based tutorial mission: odd missions go to player 1.
pub fn mission_player(mission: u8) -> Option<Player> {
    if mission == 0 || mission > TUTORIAL_MISSIONS {
        return None;
    }
    Some(if mission % 2 == 1 {
        Player::One
    } else {
        Player::Two
    })
}

/// Scripted tutorial round a mission is played in: the first round whose
/// player and challenge both match the mission.
pub fn mission_round(mission: u8) -> Option<u8> {
    let challenge = mission_challenge(mission)?;
    let player = mission_player(mission)?;
    TUTORIAL_TURN_ORDER
        .iter()
        .zip(TUTORIAL_CHALLENGES.iter())
        .position(|(&p, &c)| p == player && c == challenge)
        .map(|idx| idx as u8 + 1)
}

/// Mission teaching the challenge of a 1-based scripted tutorial round.
pub fn round_mission(round: u8) -> Option<u8> {
    let idx = (round as usize).checked_sub(1)?;
    let challenge = TUTORIAL_CHALLENGES.get(idx)?;
    Some(challenge.index() as u8 + 1)
}
