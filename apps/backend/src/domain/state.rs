use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::rooms::Room;
use crate::domain::rules::ROSTER_SIZE;
use crate::errors::domain::{DomainError, NotFoundKind};

fn uuid_from_rng<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub Uuid);

impl MatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(uuid_from_rng(rng))
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(uuid_from_rng(rng))
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// All seats AI-controlled; spectated only.
    Arena,
    /// Humans join, AI fills the rest.
    Lobby,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Waiting,
    Playing,
    Finished,
}

/// Match phases. `Finished` is carried by [`MatchStatus`], not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Lobby,
    Roaming,
    Discussion,
    Voting,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Lobby => "lobby",
            Phase::Roaming => "roaming",
            Phase::Discussion => "discussion",
            Phase::Voting => "voting",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Crewmate,
    Impostor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Crewmates,
    Impostor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Pink,
    Cyan,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// An unreported body. Location and owner are always set together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    pub room: Room,
    pub owner: ParticipantId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub mode: MatchMode,
    pub status: MatchStatus,
    pub phase: Phase,
    /// 0 until the match starts, then 1-based.
    pub round_number: u32,
    #[serde(with = "time::serde::rfc3339::option")]
    pub phase_deadline: Option<OffsetDateTime>,
    pub impostor_id: Option<ParticipantId>,
    pub winner: Option<Winner>,
    pub body: Option<Body>,
    pub entry_fee: u64,
    pub pot: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Match {
    pub fn new(id: MatchId, mode: MatchMode, entry_fee: u64) -> Self {
        Self {
            id,
            mode,
            status: MatchStatus::Waiting,
            phase: Phase::Lobby,
            round_number: 0,
            phase_deadline: None,
            impostor_id: None,
            winner: None,
            body: None,
            entry_fee,
            pot: 0,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub match_id: MatchId,
    /// External identity of a human seat (wallet, handle); `None` for AI.
    pub identity: Option<String>,
    pub color: Color,
    pub role: Role,
    pub is_ai: bool,
    pub alive: bool,
    pub room: Room,
    pub has_voted: bool,
    /// Only meaningful inside a voting phase; `None` means skip.
    pub vote_target: Option<ParticipantId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEntry {
    pub id: Uuid,
    pub match_id: MatchId,
    pub author: ParticipantId,
    pub author_color: Color,
    pub text: String,
    /// Arrival order within the match.
    pub seq: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LivingCounts {
    pub impostors: usize,
    pub crewmates: usize,
}

/// Entire live match container, sufficient for pure domain operations.
#[derive(Debug, Clone)]
pub struct MatchState {
    pub info: Match,
    /// Never removed for the lifetime of the match, only mutated.
    pub participants: Vec<Participant>,
    /// Current discussion's chat; reset at each discussion entry.
    pub chat_log: Vec<ChatEntry>,
    pub next_chat_seq: u64,
    /// Victim of the first kill; written once.
    pub first_death: Option<ParticipantId>,
}

impl MatchState {
    pub fn new(info: Match) -> Self {
        Self {
            info,
            participants: Vec::with_capacity(ROSTER_SIZE),
            chat_log: Vec::new(),
            next_chat_seq: 1,
            first_death: None,
        }
    }

    pub fn id(&self) -> MatchId {
        self.info.id
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    pub fn require_participant(&self, id: ParticipantId) -> Result<&Participant, DomainError> {
        self.participant(id).ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Participant,
                format!("participant {id} is not in match {}", self.info.id),
            )
        })
    }

    pub fn living(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.alive)
    }

    pub fn living_counts(&self) -> LivingCounts {
        self.living().fold(LivingCounts::default(), |mut acc, p| {
            match p.role {
                Role::Impostor => acc.impostors += 1,
                Role::Crewmate => acc.crewmates += 1,
            }
            acc
        })
    }

    pub fn all_living_voted(&self) -> bool {
        self.living().all(|p| p.has_voted)
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= ROSTER_SIZE
    }

    pub fn is_finished(&self) -> bool {
        self.info.status == MatchStatus::Finished
    }

    pub fn has_identity(&self, identity: &str) -> bool {
        self.participants
            .iter()
            .any(|p| p.identity.as_deref() == Some(identity))
    }

    pub fn human_count(&self) -> usize {
        self.participants.iter().filter(|p| !p.is_ai).count()
    }

    /// Record the first death of the match. Returns true if this call set it.
    pub fn record_first_death(&mut self, victim: ParticipantId) -> bool {
        if self.first_death.is_some() {
            return false;
        }
        self.first_death = Some(victim);
        true
    }
}
