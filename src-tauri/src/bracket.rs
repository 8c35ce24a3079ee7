use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

pub const ENTRANTS_PER_SIDE: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
  Left,
  Right,
}

impl Side {
  pub const ALL: [Side; 2] = [Side::Left, Side::Right];

  pub fn as_str(self) -> &'static str {
    match self {
      Side::Left => "left",
      Side::Right => "right",
    }
  }

  fn initial(self) -> char {
    match self {
      Side::Left => 'L',
      Side::Right => 'R',
    }
  }
}

/// Bracket stages. Rounds one through four exist once per side; the
/// championship slot is shared by both sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Round {
  Opening,
  Second,
  Semifinal,
  Final,
  Championship,
}

impl Round {
  pub const PER_SIDE: [Round; 4] = [Round::Opening, Round::Second, Round::Semifinal, Round::Final];

  pub fn from_number(number: u8) -> Option<Round> {
    match number {
      1 => Some(Round::Opening),
      2 => Some(Round::Second),
      3 => Some(Round::Semifinal),
      4 => Some(Round::Final),
      5 => Some(Round::Championship),
      _ => None,
    }
  }

  pub fn number(self) -> u8 {
    match self {
      Round::Opening => 1,
      Round::Second => 2,
      Round::Semifinal => 3,
      Round::Final => 4,
      Round::Championship => 5,
    }
  }

  pub fn slots_per_side(self) -> usize {
    match self {
      Round::Opening => ENTRANTS_PER_SIDE,
      Round::Second => 5,
      Round::Semifinal => 2,
      Round::Final | Round::Championship => 1,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Round::Opening => "Round 1",
      Round::Second => "Round 2",
      Round::Semifinal => "Semifinals",
      Round::Final => "Finals",
      Round::Championship => "Tournament Champion",
    }
  }
}

/// Address of a single slot. The championship has no side, so it gets its
/// own variant instead of a sentinel side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SlotKey {
  Side { side: Side, round: Round, position: usize },
  Champion,
}

impl SlotKey {
  /// Returns `None` when `position` falls outside the round's capacity.
  pub fn new(side: Side, round: Round, position: usize) -> Option<SlotKey> {
    if position >= round.slots_per_side() {
      return None;
    }
    if round == Round::Championship {
      return Some(SlotKey::Champion);
    }
    Some(SlotKey::Side { side, round, position })
  }

  pub fn side(self) -> Option<Side> {
    match self {
      SlotKey::Side { side, .. } => Some(side),
      SlotKey::Champion => None,
    }
  }

  pub fn round(self) -> Round {
    match self {
      SlotKey::Side { round, .. } => round,
      SlotKey::Champion => Round::Championship,
    }
  }

  pub fn position(self) -> usize {
    match self {
      SlotKey::Side { position, .. } => position,
      SlotKey::Champion => 0,
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactFile {
  pub name: String,
  pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entrant {
  pub id: String,
  pub name: String,
  pub file: Option<ArtifactFile>,
  /// Dereferenceable handle for `file`, allocated by the session's artifact store.
  pub file_url: Option<String>,
  pub url: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactStatus {
  FileUploaded,
  UrlAdded,
  None,
}

impl Entrant {
  fn placeholder(side: Side, number: usize) -> Self {
    Entrant {
      id: format!("{}-{number}", side.as_str()),
      name: format!("Contestant {}{number}", side.initial()),
      file: None,
      file_url: None,
      url: None,
    }
  }

  pub fn artifact_status(&self) -> ArtifactStatus {
    if non_empty(self.file_url.as_deref()) {
      ArtifactStatus::FileUploaded
    } else if non_empty(self.url.as_deref()) {
      ArtifactStatus::UrlAdded
    } else {
      ArtifactStatus::None
    }
  }

  pub fn has_artifact(&self) -> bool {
    self.artifact_status() != ArtifactStatus::None
  }
}

fn non_empty(value: Option<&str>) -> bool {
  value.map(|v| !v.is_empty()).unwrap_or(false)
}

/// Where the occupant of a slot goes when its "Advance" action fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdvanceAction {
  pub to_round: Round,
  pub position: usize,
}

/// Position in the next round fed by the pair containing `index`.
pub fn pair_destination(index: usize) -> usize {
  index / 2
}

/// Structural advance action for a slot, ignoring occupancy. Only the second
/// entry of each pair carries the action; the first is display-only. The fifth
/// round-two slot has no partner and never advances.
pub fn advance_action(round: Round, index: usize) -> Option<AdvanceAction> {
  match round {
    Round::Opening if index < ENTRANTS_PER_SIDE && index % 2 == 1 => Some(AdvanceAction {
      to_round: Round::Second,
      position: pair_destination(index),
    }),
    Round::Second if index < 4 && index % 2 == 1 => Some(AdvanceAction {
      to_round: Round::Semifinal,
      position: pair_destination(index),
    }),
    Round::Semifinal if index == 1 => Some(AdvanceAction {
      to_round: Round::Final,
      position: 0,
    }),
    Round::Final if index == 0 => Some(AdvanceAction {
      to_round: Round::Championship,
      position: 0,
    }),
    _ => None,
  }
}

// ── Read view ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketMeta {
  pub title: String,
  pub subtitle: String,
  pub session_started_at: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrantView {
  pub id: String,
  pub name: String,
  pub artifact_status: ArtifactStatus,
  pub file_name: Option<String>,
  pub file_url: Option<String>,
  pub url: Option<String>,
  pub url_input_mode: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotState {
  pub position: usize,
  pub entrant: Option<EntrantView>,
  pub can_advance: bool,
  pub advance_to_round: Option<u8>,
  pub advance_position: Option<usize>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundState {
  pub round: u8,
  pub label: String,
  pub slots: Vec<SlotState>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SideState {
  pub side: Side,
  pub rounds: Vec<RoundState>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionView {
  pub label: String,
  pub entrant: EntrantView,
  pub artifact_submitted: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketState {
  #[serde(flatten)]
  pub meta: BracketMeta,
  pub left: SideState,
  pub right: SideState,
  pub champion: Option<ChampionView>,
}

// ── Engine ─────────────────────────────────────────────────────────────

/// Owns every slot of the bracket. Occupants are shared with the slot they
/// were advanced from; edits to a round-one card are copy-on-write, so slots
/// filled earlier keep the value they were advanced with.
#[derive(Clone, Debug)]
pub struct BracketEngine {
  slots: BTreeMap<SlotKey, Arc<Entrant>>,
  url_input_mode: HashMap<String, bool>,
}

impl Default for BracketEngine {
  fn default() -> Self {
    BracketEngine::new()
  }
}

impl BracketEngine {
  pub fn new() -> Self {
    let mut slots = BTreeMap::new();
    for side in Side::ALL {
      for index in 0..ENTRANTS_PER_SIDE {
        let key = SlotKey::Side { side, round: Round::Opening, position: index };
        slots.insert(key, Arc::new(Entrant::placeholder(side, index + 1)));
      }
    }
    BracketEngine {
      slots,
      url_input_mode: HashMap::new(),
    }
  }

  pub fn entrant(&self, key: SlotKey) -> Option<&Arc<Entrant>> {
    self.slots.get(&key)
  }

  pub fn round_one(&self, side: Side) -> Vec<Arc<Entrant>> {
    self
      .round_slots(side, Round::Opening)
      .into_iter()
      .flatten()
      .collect()
  }

  pub fn round_slots(&self, side: Side, round: Round) -> Vec<Option<Arc<Entrant>>> {
    (0..round.slots_per_side())
      .map(|position| {
        SlotKey::new(side, round, position)
          .and_then(|key| self.slots.get(&key))
          .cloned()
      })
      .collect()
  }

  pub fn finalist(&self, side: Side) -> Option<&Arc<Entrant>> {
    self.slots.get(&SlotKey::Side { side, round: Round::Final, position: 0 })
  }

  pub fn champion(&self) -> Option<&Arc<Entrant>> {
    self.slots.get(&SlotKey::Champion)
  }

  pub fn champion_has_artifact(&self) -> bool {
    self.champion().map(|c| c.has_artifact()).unwrap_or(false)
  }

  pub fn is_url_input_mode(&self, entrant_id: &str) -> bool {
    self.url_input_mode.get(entrant_id).copied().unwrap_or(false)
  }

  pub fn find_round_one(&self, side: Side, entrant_id: &str) -> Option<&Arc<Entrant>> {
    self
      .slots
      .iter()
      .find(|(key, entrant)| is_round_one_on(**key, side) && entrant.id == entrant_id)
      .map(|(_, entrant)| entrant)
  }

  fn round_one_mut(&mut self, side: Side, entrant_id: &str) -> Option<&mut Entrant> {
    self
      .slots
      .iter_mut()
      .find(|(key, entrant)| is_round_one_on(**key, side) && entrant.id == entrant_id)
      .map(|(_, entrant)| Arc::make_mut(entrant))
  }

  /// Returns false when no round-one entrant on `side` has `entrant_id`.
  pub fn rename(&mut self, side: Side, entrant_id: &str, name: &str) -> bool {
    match self.round_one_mut(side, entrant_id) {
      Some(entrant) => {
        entrant.name = name.to_string();
        debug!(side = side.as_str(), entrant_id, name, "renamed entrant");
        true
      }
      None => false,
    }
  }

  /// Stores the file and its handle. A previously stored URL is kept.
  pub fn attach_artifact_file(
    &mut self,
    side: Side,
    entrant_id: &str,
    file: ArtifactFile,
    file_url: String,
  ) -> bool {
    match self.round_one_mut(side, entrant_id) {
      Some(entrant) => {
        debug!(side = side.as_str(), entrant_id, file = %file.name, "attached artifact file");
        entrant.file = Some(file);
        entrant.file_url = Some(file_url);
        true
      }
      None => false,
    }
  }

  /// Stores the URL. A previously stored file is kept.
  pub fn attach_artifact_url(&mut self, side: Side, entrant_id: &str, url: &str) -> bool {
    match self.round_one_mut(side, entrant_id) {
      Some(entrant) => {
        entrant.url = Some(url.to_string());
        debug!(side = side.as_str(), entrant_id, url, "attached artifact url");
        true
      }
      None => false,
    }
  }

  /// Flips the input mode for any id, known or not. Returns the new mode.
  pub fn toggle_artifact_input_mode(&mut self, entrant_id: &str) -> bool {
    let mode = self.url_input_mode.entry(entrant_id.to_string()).or_insert(false);
    *mode = !*mode;
    *mode
  }

  /// Writes `entrant` into the slot selected by `target_round`. Rounds 2 and 3
  /// use `position`; round 4 ignores it; round 5 ignores `side` as well. Any
  /// occupant is replaced. Unknown rounds and out-of-range positions write nothing.
  pub fn advance(
    &mut self,
    entrant: Arc<Entrant>,
    target_round: u8,
    side: Side,
    position: usize,
  ) -> Option<SlotKey> {
    let key = match Round::from_number(target_round) {
      Some(round @ (Round::Second | Round::Semifinal)) => SlotKey::new(side, round, position),
      Some(Round::Final) => SlotKey::new(side, Round::Final, 0),
      Some(Round::Championship) => Some(SlotKey::Champion),
      Some(Round::Opening) | None => None,
    };
    let key = match key {
      Some(key) => key,
      None => {
        debug!(target_round, side = side.as_str(), position, "advance target rejected");
        return None;
      }
    };
    debug!(entrant_id = %entrant.id, ?key, "advanced entrant");
    self.slots.insert(key, entrant);
    Some(key)
  }

  /// Advance action currently exposed by an occupied slot. The finals action
  /// only appears once both sides have a finalist.
  pub fn slot_action(&self, key: SlotKey) -> Option<AdvanceAction> {
    if !self.slots.contains_key(&key) {
      return None;
    }
    let action = advance_action(key.round(), key.position())?;
    if action.to_round == Round::Championship
      && (self.finalist(Side::Left).is_none() || self.finalist(Side::Right).is_none())
    {
      return None;
    }
    Some(action)
  }

  /// Fires the advance action of the slot at (side, round, position), moving its
  /// occupant forward. No-op when the slot exposes no action.
  pub fn advance_slot(&mut self, side: Side, round: u8, position: usize) -> Option<SlotKey> {
    let key = Round::from_number(round).and_then(|round| SlotKey::new(side, round, position))?;
    let action = self.slot_action(key)?;
    let entrant = self.slots.get(&key).cloned()?;
    self.advance(entrant, action.to_round.number(), side, action.position)
  }

  pub fn snapshot(&self, meta: &BracketMeta) -> BracketState {
    let champion = self.champion().map(|entrant| ChampionView {
      label: Round::Championship.label().to_string(),
      entrant: self.entrant_view(entrant),
      artifact_submitted: entrant.has_artifact(),
    });
    BracketState {
      meta: meta.clone(),
      left: self.side_state(Side::Left),
      right: self.side_state(Side::Right),
      champion,
    }
  }

  fn side_state(&self, side: Side) -> SideState {
    let rounds = Round::PER_SIDE
      .iter()
      .map(|&round| {
        let slots = (0..round.slots_per_side())
          .filter_map(|position| SlotKey::new(side, round, position))
          .map(|key| self.slot_state(key))
          .collect();
        RoundState {
          round: round.number(),
          label: round.label().to_string(),
          slots,
        }
      })
      .collect();
    SideState { side, rounds }
  }

  fn slot_state(&self, key: SlotKey) -> SlotState {
    let action = self.slot_action(key);
    SlotState {
      position: key.position(),
      entrant: self.slots.get(&key).map(|e| self.entrant_view(e)),
      can_advance: action.is_some(),
      advance_to_round: action.map(|a| a.to_round.number()),
      advance_position: action.map(|a| a.position),
    }
  }

  fn entrant_view(&self, entrant: &Entrant) -> EntrantView {
    EntrantView {
      id: entrant.id.clone(),
      name: entrant.name.clone(),
      artifact_status: entrant.artifact_status(),
      file_name: entrant.file.as_ref().map(|f| f.name.clone()),
      file_url: entrant.file_url.clone(),
      url: entrant.url.clone(),
      url_input_mode: self.is_url_input_mode(&entrant.id),
    }
  }
}

fn is_round_one_on(key: SlotKey, side: Side) -> bool {
  matches!(key, SlotKey::Side { side: s, round: Round::Opening, .. } if s == side)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entrant_at(engine: &BracketEngine, side: Side, index: usize) -> Arc<Entrant> {
    engine.round_one(side)[index].clone()
  }

  fn occupied(engine: &BracketEngine) -> BTreeMap<SlotKey, Arc<Entrant>> {
    engine.slots.clone()
  }

  #[test]
  fn test_initial_bracket_shape() {
    let engine = BracketEngine::new();
    for side in Side::ALL {
      let entrants = engine.round_one(side);
      assert_eq!(entrants.len(), ENTRANTS_PER_SIDE);
      assert!(engine.round_slots(side, Round::Second).iter().all(|s| s.is_none()));
      assert_eq!(engine.round_slots(side, Round::Second).len(), 5);
      assert_eq!(engine.round_slots(side, Round::Semifinal).len(), 2);
      assert!(engine.finalist(side).is_none());
    }
    assert!(engine.champion().is_none());
    let left = engine.round_one(Side::Left);
    assert_eq!(left[0].id, "left-1");
    assert_eq!(left[0].name, "Contestant L1");
    assert_eq!(left[9].name, "Contestant L10");
    let right = engine.round_one(Side::Right);
    assert_eq!(right[4].id, "right-5");
    assert_eq!(right[4].name, "Contestant R5");
    assert!(left.iter().all(|e| e.file.is_none() && e.url.is_none()));
  }

  #[test]
  fn test_only_second_of_each_opening_pair_advances() {
    let engine = BracketEngine::new();
    for side in Side::ALL {
      for k in 0..ENTRANTS_PER_SIDE / 2 {
        let first = SlotKey::new(side, Round::Opening, 2 * k).unwrap();
        let second = SlotKey::new(side, Round::Opening, 2 * k + 1).unwrap();
        assert_eq!(engine.slot_action(first), None);
        assert_eq!(
          engine.slot_action(second),
          Some(AdvanceAction { to_round: Round::Second, position: k })
        );
      }
    }
  }

  #[test]
  fn test_structural_actions_for_later_rounds() {
    assert_eq!(advance_action(Round::Second, 0), None);
    assert_eq!(
      advance_action(Round::Second, 1),
      Some(AdvanceAction { to_round: Round::Semifinal, position: 0 })
    );
    assert_eq!(
      advance_action(Round::Second, 3),
      Some(AdvanceAction { to_round: Round::Semifinal, position: 1 })
    );
    assert_eq!(advance_action(Round::Second, 4), None);
    assert_eq!(advance_action(Round::Semifinal, 0), None);
    assert_eq!(
      advance_action(Round::Semifinal, 1),
      Some(AdvanceAction { to_round: Round::Final, position: 0 })
    );
    assert_eq!(advance_action(Round::Championship, 0), None);
  }

  #[test]
  fn test_advance_into_round_two_touches_one_slot() {
    let mut engine = BracketEngine::new();
    let entrant = entrant_at(&engine, Side::Left, 5);
    let before = occupied(&engine);

    let written = engine.advance(entrant.clone(), 2, Side::Left, 3);

    let key = SlotKey::Side { side: Side::Left, round: Round::Second, position: 3 };
    assert_eq!(written, Some(key));
    let after = occupied(&engine);
    assert!(Arc::ptr_eq(after.get(&key).unwrap(), &entrant));
    assert_eq!(after.len(), before.len() + 1);
    for (k, v) in &before {
      assert!(Arc::ptr_eq(after.get(k).unwrap(), v));
    }
  }

  #[test]
  fn test_advance_to_finals_ignores_position() {
    let mut engine = BracketEngine::new();
    let entrant = entrant_at(&engine, Side::Right, 1);
    let written = engine.advance(entrant.clone(), 4, Side::Right, 7);
    assert_eq!(written, Some(SlotKey::Side { side: Side::Right, round: Round::Final, position: 0 }));
    assert_eq!(engine.finalist(Side::Right).unwrap().id, "right-2");
    assert!(engine.finalist(Side::Left).is_none());
  }

  #[test]
  fn test_advance_to_champion_ignores_side() {
    let mut engine = BracketEngine::new();
    let left = entrant_at(&engine, Side::Left, 1);
    let right = entrant_at(&engine, Side::Right, 1);

    assert_eq!(engine.advance(left, 5, Side::Left, 0), Some(SlotKey::Champion));
    assert_eq!(engine.champion().unwrap().id, "left-2");

    assert_eq!(engine.advance(right, 5, Side::Right, 3), Some(SlotKey::Champion));
    assert_eq!(engine.champion().unwrap().id, "right-2");
  }

  #[test]
  fn test_advance_rejects_unknown_targets() {
    let mut engine = BracketEngine::new();
    let entrant = entrant_at(&engine, Side::Left, 1);
    let before = occupied(&engine);
    assert_eq!(engine.advance(entrant.clone(), 1, Side::Left, 0), None);
    assert_eq!(engine.advance(entrant.clone(), 6, Side::Left, 0), None);
    assert_eq!(engine.advance(entrant, 2, Side::Left, 5), None);
    assert_eq!(occupied(&engine), before);
  }

  #[test]
  fn test_readvance_overwrites_semifinal() {
    let mut engine = BracketEngine::new();
    let first = entrant_at(&engine, Side::Left, 1);
    let second = entrant_at(&engine, Side::Left, 3);
    engine.advance(first, 3, Side::Left, 1);
    engine.advance(second, 3, Side::Left, 1);
    let slots = engine.round_slots(Side::Left, Round::Semifinal);
    assert!(slots[0].is_none());
    assert_eq!(slots[1].as_ref().unwrap().name, "Contestant L4");
  }

  #[test]
  fn test_rename_unknown_identity_is_noop() {
    let mut engine = BracketEngine::new();
    let before = engine.round_one(Side::Left);
    assert!(!engine.rename(Side::Left, "left-42", "Nobody"));
    assert!(!engine.rename(Side::Left, "right-1", "Wrong side"));
    assert_eq!(engine.round_one(Side::Left), before);
  }

  #[test]
  fn test_rename_after_advance_keeps_advanced_value() {
    let mut engine = BracketEngine::new();
    engine.advance_slot(Side::Left, 1, 1);
    assert!(engine.rename(Side::Left, "left-2", "Alice"));
    assert_eq!(engine.round_one(Side::Left)[1].name, "Alice");
    let advanced = engine.round_slots(Side::Left, Round::Second)[0].clone().unwrap();
    assert_eq!(advanced.name, "Contestant L2");
  }

  #[test]
  fn test_advance_pairs_in_order() {
    let mut engine = BracketEngine::new();
    let l2 = entrant_at(&engine, Side::Left, 1);
    let l4 = entrant_at(&engine, Side::Left, 3);

    engine.advance(l2, 2, Side::Left, pair_destination(1));
    assert_eq!(
      engine.round_slots(Side::Left, Round::Second)[0].as_ref().unwrap().name,
      "Contestant L2"
    );

    engine.advance(l4, 2, Side::Left, pair_destination(3));
    let round_two = engine.round_slots(Side::Left, Round::Second);
    assert_eq!(round_two[0].as_ref().unwrap().name, "Contestant L2");
    assert_eq!(round_two[1].as_ref().unwrap().name, "Contestant L4");
  }

  #[test]
  fn test_url_on_first_of_pair_goes_nowhere() {
    let mut engine = BracketEngine::new();
    assert!(engine.attach_artifact_url(Side::Left, "left-1", "ipfs://abc"));
    assert_eq!(engine.advance_slot(Side::Left, 1, 0), None);
    engine.advance_slot(Side::Left, 1, 1);

    assert_eq!(engine.round_one(Side::Left)[0].url.as_deref(), Some("ipfs://abc"));
    let round_two = engine.round_slots(Side::Left, Round::Second);
    assert_eq!(round_two[0].as_ref().unwrap().id, "left-2");
    assert!(round_two.iter().flatten().all(|e| e.url.is_none()));
  }

  #[test]
  fn test_file_and_url_fields_are_independent() {
    let mut engine = BracketEngine::new();
    let file = ArtifactFile {
      name: "claim.json".to_string(),
      path: PathBuf::from("/tmp/claim.json"),
    };
    engine.attach_artifact_url(Side::Right, "right-3", "https://example.org/atom");
    engine.attach_artifact_file(Side::Right, "right-3", file, "http://127.0.0.1/artifacts/artifact-1".into());
    let entrant = engine.find_round_one(Side::Right, "right-3").unwrap();
    assert_eq!(entrant.url.as_deref(), Some("https://example.org/atom"));
    assert_eq!(entrant.file.as_ref().unwrap().name, "claim.json");
    assert_eq!(entrant.artifact_status(), ArtifactStatus::FileUploaded);

    engine.attach_artifact_url(Side::Right, "right-3", "ipfs://replaced");
    let entrant = engine.find_round_one(Side::Right, "right-3").unwrap();
    assert_eq!(entrant.url.as_deref(), Some("ipfs://replaced"));
    assert!(entrant.file.is_some());
  }

  #[test]
  fn test_artifact_status_ignores_empty_strings() {
    let mut engine = BracketEngine::new();
    engine.attach_artifact_url(Side::Left, "left-2", "");
    let entrant = engine.find_round_one(Side::Left, "left-2").unwrap();
    assert_eq!(entrant.url.as_deref(), Some(""));
    assert_eq!(entrant.artifact_status(), ArtifactStatus::None);
    assert!(!entrant.has_artifact());
  }

  #[test]
  fn test_toggle_input_mode_flips_per_entrant() {
    let mut engine = BracketEngine::new();
    assert!(!engine.is_url_input_mode("left-1"));
    assert!(engine.toggle_artifact_input_mode("left-1"));
    assert!(engine.is_url_input_mode("left-1"));
    assert!(!engine.is_url_input_mode("left-2"));
    assert!(!engine.toggle_artifact_input_mode("left-1"));
    assert!(engine.toggle_artifact_input_mode("unknown"));
    assert!(engine.round_one(Side::Left).iter().all(|e| e.url.is_none()));
  }

  #[test]
  fn test_champion_requires_both_finalists_on_slot_path() {
    let mut engine = BracketEngine::new();
    for index in [1, 3, 5, 7] {
      engine.advance_slot(Side::Left, 1, index);
    }
    engine.advance_slot(Side::Left, 2, 1);
    engine.advance_slot(Side::Left, 2, 3);
    engine.advance_slot(Side::Left, 3, 1);
    assert_eq!(engine.finalist(Side::Left).unwrap().id, "left-8");

    let finals = SlotKey::Side { side: Side::Left, round: Round::Final, position: 0 };
    assert_eq!(engine.slot_action(finals), None);
    assert_eq!(engine.advance_slot(Side::Left, 4, 0), None);
    assert!(engine.champion().is_none());

    // Only the second semifinal slot feeds the final.
    engine.advance_slot(Side::Right, 1, 1);
    engine.advance_slot(Side::Right, 1, 3);
    engine.advance_slot(Side::Right, 2, 1);
    assert_eq!(engine.advance_slot(Side::Right, 3, 0), None);
    assert!(engine.finalist(Side::Right).is_none());
    engine.advance_slot(Side::Right, 1, 5);
    engine.advance_slot(Side::Right, 1, 7);
    engine.advance_slot(Side::Right, 2, 3);
    engine.advance_slot(Side::Right, 3, 1);
    assert_eq!(engine.finalist(Side::Right).unwrap().id, "right-8");

    assert!(engine.slot_action(finals).is_some());
    assert_eq!(engine.advance_slot(Side::Right, 4, 0), Some(SlotKey::Champion));
    assert_eq!(engine.champion().unwrap().id, "right-8");
    assert!(!engine.champion_has_artifact());
  }

  #[test]
  fn test_round_two_fifth_slot_never_advances() {
    let mut engine = BracketEngine::new();
    engine.advance_slot(Side::Left, 1, 9);
    assert_eq!(engine.round_slots(Side::Left, Round::Second)[4].as_ref().unwrap().id, "left-10");
    assert_eq!(engine.advance_slot(Side::Left, 2, 4), None);
    assert!(engine.round_slots(Side::Left, Round::Semifinal).iter().all(|s| s.is_none()));
  }

  #[test]
  fn test_empty_slot_exposes_no_action() {
    let engine = BracketEngine::new();
    let key = SlotKey::Side { side: Side::Left, round: Round::Second, position: 1 };
    assert_eq!(engine.slot_action(key), None);
  }

  #[test]
  fn test_champion_artifact_flag() {
    let mut engine = BracketEngine::new();
    engine.attach_artifact_url(Side::Left, "left-2", "ipfs://atom");
    let carrier = entrant_at(&engine, Side::Left, 1);
    engine.advance(carrier, 5, Side::Left, 0);
    assert!(engine.champion_has_artifact());

    let bare = entrant_at(&engine, Side::Left, 3);
    engine.advance(bare, 5, Side::Left, 0);
    assert!(!engine.champion_has_artifact());

    engine.attach_artifact_file(
      Side::Left,
      "left-6",
      ArtifactFile { name: "a.atom".into(), path: PathBuf::from("a.atom") },
      "http://127.0.0.1:17880/artifacts/artifact-1".into(),
    );
    let with_file = entrant_at(&engine, Side::Left, 5);
    engine.advance(with_file, 5, Side::Right, 0);
    assert!(engine.champion_has_artifact());
  }

  #[test]
  fn test_snapshot_exposes_actions_and_champion() {
    let mut engine = BracketEngine::new();
    engine.toggle_artifact_input_mode("left-2");
    engine.advance_slot(Side::Left, 1, 1);
    let meta = BracketMeta {
      title: "TRUST your INTUITION".into(),
      subtitle: "Atom & Claim Competition".into(),
      session_started_at: String::new(),
    };
    let state = engine.snapshot(&meta);

    assert_eq!(state.left.rounds.len(), 4);
    let opening = &state.left.rounds[0];
    assert_eq!(opening.label, "Round 1");
    assert_eq!(opening.slots.len(), 10);
    assert!(!opening.slots[0].can_advance);
    assert!(opening.slots[1].can_advance);
    assert_eq!(opening.slots[1].advance_to_round, Some(2));
    assert_eq!(opening.slots[9].advance_position, Some(4));
    assert!(opening.slots[1].entrant.as_ref().unwrap().url_input_mode);

    let second = &state.left.rounds[1];
    assert_eq!(second.slots[0].entrant.as_ref().unwrap().name, "Contestant L2");
    assert!(!second.slots[0].can_advance);
    assert!(second.slots[1].entrant.is_none());
    assert_eq!(state.left.rounds[2].label, "Semifinals");
    assert!(state.champion.is_none());

    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["title"], "TRUST your INTUITION");
    assert_eq!(json["left"]["side"], "left");
    assert_eq!(json["left"]["rounds"][0]["slots"][1]["canAdvance"], true);
    assert_eq!(json["left"]["rounds"][0]["slots"][0]["entrant"]["artifactStatus"], "none");
  }
}
