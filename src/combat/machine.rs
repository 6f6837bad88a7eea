//! The combat state machine.
//!
//! ```text
//! InitCombat -> [ProvokeMarauders] -> RangeAttack -> Block -> AssignDamage
//!            -> Attack -> CombatEnd -> [CombatRewards] -> EndOfTurn
//! ```
//!
//! Entering a phase clears the selection and skips phases with nothing to
//! do: no enemy alive ends the combat, no attacking enemy skips blocking,
//! no damage left skips assigning it. `next` resolves the selected enemies
//! and re-enters the same phase; `skip` moves on without resolving.

use im::Vector;
use log::{debug, info};

use crate::cards::{OfferItem, OfferKind};
use crate::core::{Error, ManaColor, Result};
use crate::effects::{Effect, EffectKind};
use crate::enemies::{EnemyAttack, PoolEdit};
use crate::game::{Change, Match, Phase, Pile, PlayerEdit, Topic, UnitInstance};
use crate::map::HexCoord;

use super::enemy::{CombatEnemyId, EnemyInCombat};
use super::resolve::{resolve_attack, resolve_block};
use super::reward::{CombatReward, RewardItem, RewardKind};
use super::state::{Combat, CombatEdit};

impl Match {
    /// Open a combat. Enemies join with
    /// [`combat_add_enemies`](Self::combat_add_enemies).
    pub(crate) fn combat_init(
        &mut self,
        units_allowed: bool,
        night_rules: bool,
        retreat_to: Option<HexCoord>,
    ) -> Result<()> {
        if self.combat_state().is_some() {
            return Err(Error::invalid("You already fought a combat this turn."));
        }
        if self.phase() != Phase::Movement {
            return Err(Error::invalid("You cannot start a combat now."));
        }
        let combat = Combat::new(units_allowed, night_rules, retreat_to);
        self.record(Change::Engage {
            before: None,
            after: Some(Box::new(combat)),
        })?;
        self.set_phase(Phase::InitCombat)
    }

    /// Add the enemies on `site` to the combat being set up.
    pub(crate) fn combat_add_enemies(&mut self, site: HexCoord, provokable: bool) -> Result<()> {
        if self.phase() != Phase::InitCombat {
            return Err(Error::invalid("Enemies can only join a combat before it starts."));
        }
        if self.combat_ref()?.sites.contains(&site) {
            return Err(Error::invalid(format!("The enemies at {site} already take part.")));
        }
        self.reveal_site(site);
        let ids: Vec<_> = match self.state().map.site_at(site) {
            Some(s) => s.revealed_enemies().collect(),
            None => return Err(Error::invalid(format!("There is no site at {site}."))),
        };

        let catalog = self.catalog_handle();
        let combat = self.combat_ref()?;
        let mut enemies = combat.enemies.clone();
        let mut id = combat.next_enemy_id();
        for enemy in ids {
            let definition = catalog.enemy(enemy)?.clone();
            enemies.push_back(EnemyInCombat::new(id, definition, Some(site), provokable));
            id = CombatEnemyId(id.0 + 1);
        }
        let mut sites = combat.sites.clone();
        sites.push_back(site);
        let edits = [
            CombatEdit::Enemies {
                before: combat.enemies.clone(),
                after: enemies,
            },
            CombatEdit::Sites {
                before: combat.sites.clone(),
                after: sites,
            },
        ];
        for edit in edits {
            self.edit_combat(edit)?;
        }
        Ok(())
    }

    /// Start fighting. With provokable marauders the player first picks
    /// which of them to fight.
    pub(crate) fn combat_start(&mut self) -> Result<()> {
        if self.phase() != Phase::InitCombat {
            return Err(Error::invalid("The combat has started already."));
        }
        let combat = self.combat_ref()?;
        if !combat.enemies.iter().any(|e| e.is_provokable) {
            return self.enter_phase(Phase::RangeAttack);
        }
        let required: Vec<CombatEnemyId> = combat
            .enemies
            .iter()
            .filter(|e| !e.is_provokable)
            .map(|e| e.id)
            .collect();
        self.set_phase(Phase::ProvokeMarauders)?;
        for id in required {
            self.update_enemy(id, |e| e.is_selected = true)?;
        }
        Ok(())
    }

    fn clear_selection(&mut self) -> Result<()> {
        let selected: Vec<CombatEnemyId> = self.combat_ref()?.selected().map(|e| e.id).collect();
        for id in selected {
            self.update_enemy(id, |e| e.is_selected = false)?;
        }
        if self.combat_ref()?.effects_played {
            self.edit_combat(CombatEdit::EffectsPlayed {
                before: true,
                after: false,
            })?;
        }
        Ok(())
    }

    /// Enter `phase`, skipping ahead while there is nothing to do.
    fn enter_phase(&mut self, phase: Phase) -> Result<()> {
        self.clear_selection()?;
        let mut phase = phase;
        if !self.combat_ref()?.any_alive() {
            phase = Phase::CombatEnd;
        }
        if phase == Phase::Block {
            self.summon_enemies()?;
            if !self.combat_ref()?.any_attacking() {
                phase = Phase::Attack;
            }
        }
        if phase == Phase::AssignDamage && self.combat_ref()?.active(phase).is_empty() {
            phase = Phase::Attack;
        }
        self.set_phase(phase)?;
        if phase == Phase::CombatEnd {
            return self.end_combat();
        }
        let active = self.combat_ref()?.active(phase);
        if let [only] = active[..] {
            self.update_enemy(only, |e| e.is_selected = true)?;
        }
        debug!("combat phase {phase}");
        Ok(())
    }

    /// Every living summoner calls an enemy of its summon category. The
    /// draw is random, so this cannot be undone.
    fn summon_enemies(&mut self) -> Result<()> {
        let summoners: Vec<CombatEnemyId> = self
            .combat_ref()?
            .enemies
            .iter()
            .filter(|e| e.needs_summon())
            .map(|e| e.id)
            .collect();
        if summoners.is_empty() {
            return Ok(());
        }
        let catalog = self.catalog_handle();
        self.reveal(Topic::Combat, |state, rng| {
            let Some(combat) = state.combat.as_mut() else {
                return;
            };
            for enemy in combat.enemies.iter_mut() {
                if !summoners.contains(&enemy.id) {
                    continue;
                }
                let EnemyAttack::Summon(category) = enemy.enemy.attack else {
                    continue;
                };
                let summoned = state
                    .enemies
                    .draw(category, rng)
                    .and_then(|id| catalog.enemy(id).ok())
                    .cloned();
                if let Some(summoned) = summoned {
                    info!("{} summons {}", enemy.enemy.name, summoned.name);
                    enemy.damage = summoned.damage();
                    enemy.summoned = Some(summoned);
                }
            }
        });
        Ok(())
    }

    /// Select or deselect an enemy.
    pub(crate) fn select_enemy(&mut self, id: CombatEnemyId, select: bool) -> Result<()> {
        let phase = self.phase();
        if !phase.is_combat() || phase == Phase::InitCombat {
            return Err(Error::invalid("You cannot select enemies now."));
        }
        let combat = self.combat_ref()?;
        if combat.effects_played {
            return Err(Error::invalid("Cannot change the selection after playing effects."));
        }
        let (_, enemy) = combat
            .enemy(id)
            .ok_or_else(|| Error::invalid(format!("There is no enemy {id}.")))?;
        if select && !Combat::is_active(enemy, phase) {
            return Err(Error::invalid("Cannot select this enemy."));
        }
        if phase == Phase::ProvokeMarauders && !select && !enemy.is_provokable {
            return Err(Error::invalid("This enemy must take part."));
        }
        if select && matches!(phase, Phase::Block | Phase::AssignDamage) {
            let others: Vec<CombatEnemyId> = combat
                .selected()
                .map(|e| e.id)
                .filter(|&other| other != id)
                .collect();
            for other in others {
                self.update_enemy(other, |e| e.is_selected = false)?;
            }
        }
        self.update_enemy(id, |e| e.is_selected = select)
    }

    fn selected_ids(&self) -> Result<Vec<CombatEnemyId>> {
        let ids: Vec<CombatEnemyId> = self.combat_ref()?.selected().map(|e| e.id).collect();
        if ids.is_empty() {
            return Err(Error::invalid("Must select an enemy first."));
        }
        Ok(ids)
    }

    fn selected_enemy(&self) -> Result<EnemyInCombat> {
        let id = self.selected_ids()?[0];
        self.combat_ref()?
            .enemy(id)
            .map(|(_, e)| e.clone())
            .ok_or_else(|| Error::invalid(format!("There is no enemy {id}.")))
    }

    /// Resolve the selected enemies and re-enter the phase.
    pub(crate) fn combat_next(&mut self) -> Result<()> {
        let phase = self.phase();
        match phase {
            Phase::InitCombat => self.combat_start(),
            Phase::ProvokeMarauders => {
                self.selected_ids()?;
                let combat = self.combat_ref()?;
                let kept: Vector<EnemyInCombat> = combat
                    .enemies
                    .iter()
                    .filter(|e| e.is_selected)
                    .cloned()
                    .map(|mut e| {
                        e.is_provokable = false;
                        e
                    })
                    .collect();
                let sites: Vector<HexCoord> = combat
                    .sites
                    .iter()
                    .filter(|&&s| kept.iter().any(|e| e.site == Some(s)))
                    .copied()
                    .collect();
                let edits = [
                    CombatEdit::Enemies {
                        before: combat.enemies.clone(),
                        after: kept,
                    },
                    CombatEdit::Sites {
                        before: combat.sites.clone(),
                        after: sites,
                    },
                ];
                for edit in edits {
                    self.edit_combat(edit)?;
                }
                self.enter_phase(Phase::RangeAttack)
            }
            Phase::RangeAttack | Phase::Attack => {
                self.attack_selected()?;
                self.enter_phase(phase)
            }
            Phase::Block => {
                self.block_selected()?;
                self.enter_phase(phase)
            }
            Phase::AssignDamage => {
                self.assign_damage_to_hero()?;
                self.enter_phase(phase)
            }
            _ => Err(Error::invalid("There is no combat phase to continue.")),
        }
    }

    /// Move on without resolving anything.
    pub(crate) fn combat_skip(&mut self) -> Result<()> {
        match self.phase() {
            Phase::RangeAttack => self.enter_phase(Phase::Block),
            Phase::Block => self.enter_phase(Phase::AssignDamage),
            Phase::Attack => self.enter_phase(Phase::CombatEnd),
            _ => Err(Error::invalid("Cannot skip to the next combat phase now.")),
        }
    }

    /// Spend the given banked effects.
    fn pay_all(&mut self, effects: &[Effect]) -> Result<()> {
        for effect in effects {
            self.pay_effect(effect)?;
        }
        Ok(())
    }

    fn attack_selected(&mut self) -> Result<()> {
        let ids = self.selected_ids()?;
        let attacks: Vec<Effect> = self.effects().find_all(EffectKind::Attack).cloned().collect();
        let loses_resistance = self.effects().has(EffectKind::LosesResistance);
        let armor_reduction = self.effects().armor_reduction();
        let combat = self.combat_ref()?;
        let targets: Vec<EnemyInCombat> = combat.selected().cloned().collect();
        let report = resolve_attack(
            targets.iter().map(|e| &e.enemy),
            &attacks,
            loses_resistance,
            armor_reduction,
        );
        debug!("attack: {report:?}");
        self.pay_all(&attacks)?;
        if !report.killed {
            return Ok(());
        }
        for (id, enemy) in ids.into_iter().zip(targets) {
            self.update_enemy(id, |e| {
                e.is_alive = false;
                e.is_selected = false;
            })?;
            self.add_fame(enemy.enemy.fame)?;
            self.record(Change::Pool(PoolEdit::Discard {
                category: enemy.enemy.category,
                enemy: enemy.enemy.id,
            }))?;
            self.on_enemy_killed(&enemy)?;
            info!("{} defeated (+{} fame)", enemy.enemy.name, enemy.enemy.fame);
        }
        Ok(())
    }

    fn block_selected(&mut self) -> Result<()> {
        let enemy = self.selected_enemy()?;
        let blocks: Vec<Effect> = self.effects().find_all(EffectKind::Block).cloned().collect();
        let report = resolve_block(
            enemy.attack_element(),
            enemy.attack_value(),
            enemy.attacker().abilities.swift,
            &blocks,
        );
        debug!("block against {}: {report:?}", enemy.enemy.name);
        self.pay_all(&blocks)?;
        if report.blocked {
            self.update_enemy(enemy.id, |e| e.is_blocked = true)?;
        }
        Ok(())
    }

    fn assign_damage_to_hero(&mut self) -> Result<()> {
        let enemy = self.selected_enemy()?;
        if enemy.damage == 0 {
            return Ok(());
        }
        let player = self.current_player();
        let armor = player.armor.max(1);
        let hand_limit = player.hand_limit as u32;
        let wounds = (enemy.damage + armor - 1) / armor;
        let abilities = enemy.attacker().abilities;

        self.add_wounds(wounds, Pile::Hand)?;
        if abilities.poison {
            self.add_wounds(wounds, Pile::Discard)?;
        }
        let before = self.combat_ref()?.hero_wounds;
        let after = before + wounds;
        self.edit_combat(CombatEdit::HeroWounds { before, after })?;
        if abilities.paralyze || after >= hand_limit {
            self.knock_out()?;
        }
        info!("{} deals {} damage: {wounds} wound(s)", enemy.enemy.name, enemy.damage);
        self.update_enemy(enemy.id, |e| e.damage = 0)
    }

    /// Assign the damage of the selected enemy to a unit first.
    pub(crate) fn assign_damage_to_unit(&mut self, unit: usize) -> Result<()> {
        if self.phase() != Phase::AssignDamage {
            return Err(Error::invalid("Cannot assign damage in this phase."));
        }
        if !self.combat_ref()?.units_allowed {
            return Err(Error::invalid("Units cannot be used in this combat."));
        }
        let enemy = self.selected_enemy()?;
        let instance: UnitInstance = self
            .current_player()
            .units
            .get(unit)
            .copied()
            .ok_or_else(|| Error::invalid("There is no such unit."))?;
        if !instance.ready || instance.is_wounded() || instance.protected {
            return Err(Error::invalid("Cannot assign damage to this unit."));
        }
        let definition = self.catalog().unit(instance.unit)?.clone();
        let abilities = enemy.attacker().abilities;

        let mut damage = enemy.damage;
        if definition.resistances.resists(enemy.attack_element()) {
            damage = damage.saturating_sub(definition.armor);
        }
        let mut destroyed = false;
        if damage > 0 {
            if abilities.paralyze {
                self.remove_unit(unit)?;
                destroyed = true;
                info!("{} is destroyed", definition.title);
            } else {
                self.wound_unit(unit, if abilities.poison { 2 } else { 1 })?;
            }
            damage = damage.saturating_sub(definition.armor);
        }
        if !destroyed {
            self.update_unit(unit, |u| u.protected = true)?;
        }
        self.update_enemy(enemy.id, |e| e.damage = damage)?;
        if damage == 0 {
            self.enter_phase(Phase::AssignDamage)?;
        }
        Ok(())
    }

    /// Run the site hooks, tidy up and hand out the rewards.
    fn end_combat(&mut self) -> Result<()> {
        let combat = self.combat_ref()?.clone();

        let mut rewards = Vec::new();
        for &site in &combat.sites {
            rewards.extend(self.on_combat_end(site)?);
        }

        let protected: Vec<usize> = self
            .current_player()
            .units
            .iter()
            .enumerate()
            .filter(|(_, u)| u.protected)
            .map(|(i, _)| i)
            .collect();
        for index in protected {
            self.update_unit(index, |u| u.protected = false)?;
        }

        for enemy in combat.enemies.iter() {
            if let Some(summoned) = &enemy.summoned {
                self.record(Change::Pool(PoolEdit::Discard {
                    category: summoned.category,
                    enemy: summoned.id,
                }))?;
            }
        }
        self.edit_combat(CombatEdit::Enemies {
            before: combat.enemies.clone(),
            after: Vector::new(),
        })?;

        if let Some(retreat) = combat.retreat_to {
            let current = self.current();
            let failed = combat.sites.iter().any(|&site| {
                self.state()
                    .map
                    .site_at(site)
                    .map_or(false, |s| s.kind.is_fortified() && s.owner != Some(current))
            });
            if failed {
                let before = self.current_player().position;
                self.edit_player(PlayerEdit::Position {
                    before,
                    after: retreat,
                })?;
                info!("the assault failed, retreating to {retreat}");
            }
        }

        if !rewards.is_empty() {
            self.edit_combat(CombatEdit::Rewards {
                before: combat.rewards.clone(),
                after: rewards.into_iter().collect(),
            })?;
            self.set_phase(Phase::CombatRewards)?;
        }
        info!("combat ended after {} wound(s)", combat.hero_wounds);
        Ok(())
    }

    fn reward(&self, index: usize) -> Result<CombatReward> {
        self.combat_ref()?
            .rewards
            .get(index)
            .cloned()
            .ok_or_else(|| Error::invalid("There is no such reward."))
    }

    fn set_reward_items(&mut self, index: usize, items: Vector<RewardItem>) -> Result<()> {
        let before = self.combat_ref()?.rewards.clone();
        let mut after = before.clone();
        if let Some(reward) = after.get_mut(index) {
            reward.items = items;
        }
        if before == after {
            return Ok(());
        }
        self.edit_combat(CombatEdit::Rewards { before, after })
    }

    /// Items of an offer reward: whatever is on display now.
    fn offer_items(&self, kind: RewardKind) -> Vector<RewardItem> {
        let offers = &self.state().offers;
        match kind {
            RewardKind::Unit => offers.units().map(RewardItem::Unit).collect(),
            RewardKind::Spell => offers.spells().map(RewardItem::Card).collect(),
            RewardKind::AdvancedAction => offers.advanced_actions().map(RewardItem::Card).collect(),
            RewardKind::Crystal | RewardKind::Artifact => Vector::new(),
        }
    }

    /// Start claiming the reward at `index`.
    pub(crate) fn choose_reward_type(&mut self, index: usize) -> Result<()> {
        if self.phase() != Phase::CombatRewards {
            return Err(Error::invalid("There are no rewards to claim."));
        }
        let current = self.combat_ref()?.current_reward;
        if current.map_or(false, |c| c != index) {
            return Err(Error::invalid("Choose your reward first."));
        }
        let reward = self.reward(index)?;
        let count = reward.count as usize;
        if !reward.is_revealed() && matches!(reward.kind, RewardKind::Crystal | RewardKind::Artifact) {
            self.reveal(Topic::Combat, |state, rng| {
                let items: Vector<RewardItem> = match reward.kind {
                    RewardKind::Crystal => (0..count).map(|_| RewardItem::Die(rng.roll_mana_die())).collect(),
                    _ => state
                        .offers
                        .draw_artifacts(count + 1)
                        .into_iter()
                        .map(RewardItem::Card)
                        .collect(),
                };
                if let Some(r) = state.combat.as_mut().and_then(|c| c.rewards.get_mut(index)) {
                    r.items = items;
                }
            });
        }
        if current != Some(index) {
            self.edit_combat(CombatEdit::CurrentReward {
                before: current,
                after: Some(index),
            })?;
        }

        match reward.kind {
            RewardKind::Crystal => {
                for item in self.reward(index)?.items {
                    match item {
                        RewardItem::Die(ManaColor::Black) => self.add_fame(1)?,
                        RewardItem::Die(ManaColor::Gold) => {
                            let color = self.choose_mana_color(&ManaColor::BASIC)?;
                            self.add_crystal(color)?;
                        }
                        RewardItem::Die(color) => self.add_crystal(color)?,
                        _ => {}
                    }
                }
                self.finish_reward(index)
            }
            RewardKind::Artifact => {
                if self.reward(index)?.items.is_empty() {
                    return self.finish_reward(index);
                }
                Ok(())
            }
            kind => {
                let items = self.offer_items(kind);
                if items.is_empty() {
                    return self.finish_reward(index);
                }
                self.set_reward_items(index, items)
            }
        }
    }

    /// Take item `item` of the reward being claimed.
    pub(crate) fn choose_reward_item(&mut self, item: usize) -> Result<()> {
        let index = self
            .combat_ref()?
            .current_reward
            .ok_or_else(|| Error::invalid("Choose a reward first."))?;
        let reward = self.reward(index)?;
        let chosen = reward
            .items
            .get(item)
            .copied()
            .ok_or_else(|| Error::invalid("There is no such item."))?;
        match (reward.kind, chosen) {
            (RewardKind::Unit, RewardItem::Unit(unit)) => {
                let offer = self.take_from_offer(kind_offer(reward.kind), chosen)?;
                debug!("rewarded unit {unit} from offer slot {offer}");
                self.add_unit(UnitInstance::new(unit))?;
            }
            (RewardKind::Artifact, RewardItem::Card(card)) => {
                self.put_on_deck(card)?;
                let mut items = reward.items.clone();
                items.remove(item);
                self.set_reward_items(index, items)?;
            }
            (RewardKind::Spell | RewardKind::AdvancedAction, RewardItem::Card(card)) => {
                self.take_from_offer(kind_offer(reward.kind), chosen)?;
                self.put_on_deck(card)?;
                let (units, aa, spells) = (
                    0,
                    self.config().advanced_action_offer_size,
                    self.config().spell_offer_size,
                );
                self.reveal(Topic::Offers, |state, _| state.offers.refill(units, aa, spells));
            }
            _ => return Err(Error::invalid("This item cannot be chosen.")),
        }

        let mut remaining = self.reward(index)?;
        remaining.count = remaining.count.saturating_sub(1);
        if remaining.count == 0 {
            return self.finish_reward(index);
        }
        if matches!(remaining.kind, RewardKind::Unit | RewardKind::Spell | RewardKind::AdvancedAction) {
            remaining.items = self.offer_items(remaining.kind);
        }
        let before = self.combat_ref()?.rewards.clone();
        let mut after = before.clone();
        after.set(index, remaining);
        self.edit_combat(CombatEdit::Rewards { before, after })
    }

    /// Take `item` off its offer. Returns the offer slot it was in.
    fn take_from_offer(&mut self, offer: OfferKind, item: RewardItem) -> Result<usize> {
        let wanted = match item {
            RewardItem::Card(card) => OfferItem::Card(card),
            RewardItem::Unit(unit) => OfferItem::Unit(unit),
            RewardItem::Die(_) => return Err(Error::invalid("Dice are not on offer.")),
        };
        let slot = self
            .state()
            .offers
            .items(offer)
            .iter()
            .position(|&i| i == wanted)
            .ok_or_else(|| Error::invalid("This item is no longer on offer."))?;
        let edit = self.state().offers.plan_take(offer, slot)?;
        self.record(Change::Offer(edit))?;
        Ok(slot)
    }

    /// The reward at `index` is done: put unchosen artifacts back and move
    /// on to the next reward or the end of the turn.
    fn finish_reward(&mut self, index: usize) -> Result<()> {
        let reward = self.reward(index)?;
        if reward.kind == RewardKind::Artifact {
            let unchosen: Vec<_> = reward
                .items
                .iter()
                .filter_map(|item| match item {
                    RewardItem::Card(card) => Some(*card),
                    _ => None,
                })
                .collect();
            if !unchosen.is_empty() {
                let edit = self.state().offers.plan_return_artifacts(&unchosen);
                self.record(Change::Offer(edit))?;
            }
        }
        let combat = self.combat_ref()?;
        let before = combat.rewards.clone();
        let mut after = before.clone();
        after.remove(index);
        let current = combat.current_reward;
        self.edit_combat(CombatEdit::Rewards {
            before,
            after: after.clone(),
        })?;
        if current.is_some() {
            self.edit_combat(CombatEdit::CurrentReward {
                before: current,
                after: None,
            })?;
        }
        if after.is_empty() {
            self.set_phase(Phase::EndOfTurn)?;
        }
        Ok(())
    }
}

fn kind_offer(kind: RewardKind) -> OfferKind {
    match kind {
        RewardKind::Unit => OfferKind::Units,
        RewardKind::AdvancedAction => OfferKind::AdvancedActions,
        _ => OfferKind::Spells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AttackRange, Element, MatchConfig};
    use crate::enemies::EnemyCategory;
    use crate::game::{Answer, ScriptedChoices};
    use crate::map::{Site, SiteEnemy, SiteKind};

    const ORCS: HexCoord = HexCoord::new(1, 0);

    /// Put a site of `kind` holding the named enemies at `coords`.
    fn place(game: &mut Match, coords: HexCoord, kind: SiteKind, enemies: &[&str]) {
        let mut site = Site::new(kind);
        site.enemies = enemies
            .iter()
            .map(|name| SiteEnemy::Revealed(game.catalog().enemies.by_name(name).unwrap().id))
            .collect();
        game.state_mut_unrecorded().map.set_site(coords, site);
    }

    fn bank(game: &mut Match, effect: Effect) {
        game.action("bank", |m| m.add_effect(&effect)).unwrap();
    }

    fn prowlers() -> Match {
        let mut game = Match::new(MatchConfig::solo(21));
        place(&mut game, ORCS, SiteKind::MaraudingOrcs, &["Prowlers"]);
        game.challenge(ORCS).unwrap();
        game
    }

    #[test]
    fn test_block_then_kill() {
        let mut game = prowlers();
        assert_eq!(game.phase(), Phase::RangeAttack);
        assert!(game.combat_state().unwrap().enemies[0].is_selected);

        game.combat().skip().unwrap();
        assert_eq!(game.phase(), Phase::Block);
        bank(&mut game, Effect::block(4));
        game.combat().next().unwrap();
        // the only enemy is blocked, so nothing is left to block
        assert_eq!(game.phase(), Phase::Attack);

        bank(&mut game, Effect::attack(3));
        game.combat().next().unwrap();
        assert_eq!(game.phase(), Phase::CombatEnd);
        let player = game.current_player();
        assert_eq!(player.fame, 2);
        assert_eq!(player.reputation, 1);
        assert!(!game.state().map.site_at(ORCS).unwrap().is_active());
        assert!(game.combat_state().unwrap().enemies.is_empty());
        assert!(game.effects().is_empty());
    }

    #[test]
    fn test_weak_attack_is_spent() {
        let mut game = prowlers();
        game.combat().skip().unwrap();
        game.combat().skip().unwrap();
        game.combat().next().unwrap();
        bank(&mut game, Effect::attack(2));
        game.combat().next().unwrap();
        assert_eq!(game.phase(), Phase::Attack);
        assert!(game.combat_state().unwrap().enemies[0].is_alive);
        assert!(game.effects().is_empty());
    }

    #[test]
    fn test_unblocked_damage_wounds_hero() {
        let mut game = prowlers();
        game.combat().skip().unwrap();
        game.combat().skip().unwrap();
        assert_eq!(game.phase(), Phase::AssignDamage);

        game.combat().next().unwrap();
        let wound = game.catalog().wound();
        // 4 damage against armor 2
        assert_eq!(game.current_player().hand.iter().filter(|&&c| c == wound).count(), 2);
        assert_eq!(game.combat_state().unwrap().hero_wounds, 2);
        assert_eq!(game.phase(), Phase::Attack);

        game.combat().skip().unwrap();
        assert_eq!(game.phase(), Phase::CombatEnd);
        assert!(game.state().map.site_at(ORCS).unwrap().is_active());
        game.undo().unwrap();
        assert_eq!(game.phase(), Phase::Attack);
    }

    #[test]
    fn test_damage_to_unit() {
        let mut game = prowlers();
        let peasants = game.catalog().units.by_name("peasants").unwrap().id;
        game.action("recruit", |m| m.add_unit(UnitInstance::new(peasants)))
            .unwrap();
        game.combat().skip().unwrap();
        game.combat().skip().unwrap();

        game.combat().assign_damage_to_unit(0).unwrap();
        let unit = game.current_player().units[0];
        assert_eq!(unit.wounds, 1);
        assert!(unit.protected);
        // armor 3 absorbed most of the 4 damage
        assert_eq!(game.combat_state().unwrap().enemies[0].damage, 1);
        assert_eq!(game.phase(), Phase::AssignDamage);
        assert!(game.combat().assign_damage_to_unit(0).is_err());

        game.combat().next().unwrap();
        assert_eq!(game.combat_state().unwrap().hero_wounds, 1);
        game.combat().skip().unwrap();
        assert!(!game.current_player().units[0].protected);
    }

    #[test]
    fn test_provoke_marauders() {
        let mut game = Match::new(MatchConfig::solo(21));
        place(&mut game, ORCS, SiteKind::MaraudingOrcs, &["Prowlers"]);
        place(&mut game, HexCoord::new(0, 1), SiteKind::MaraudingOrcs, &["Diggers"]);
        game.challenge(ORCS).unwrap();
        assert_eq!(game.phase(), Phase::ProvokeMarauders);

        let combat = game.combat_state().unwrap();
        assert_eq!(combat.enemies.len(), 2);
        assert!(combat.enemies[0].is_selected && !combat.enemies[0].is_provokable);
        assert!(combat.enemies[1].is_provokable);
        let required = combat.enemies[0].id;
        assert_eq!(required, CombatEnemyId(0));
        let err = game.combat().set_enemy_selected(required, false).unwrap_err();
        assert!(err.to_string().contains("This enemy must take part"));
        let err = game.combat().set_enemy_selected(CombatEnemyId(7), true).unwrap_err();
        assert!(err.to_string().contains("There is no enemy #7"));
        game.combat().set_enemy_selected(CombatEnemyId(1), false).unwrap();
        game.combat().set_enemy_selected(CombatEnemyId(1), true).unwrap();
        game.combat().set_enemy_selected(CombatEnemyId(1), false).unwrap();

        game.combat().next().unwrap();
        let combat = game.combat_state().unwrap();
        assert_eq!(combat.enemies.len(), 1);
        assert_eq!(combat.sites.len(), 1);
        assert_eq!(game.phase(), Phase::RangeAttack);
    }

    #[test]
    fn test_selection_rules() {
        let mut game = Match::new(MatchConfig::solo(21));
        place(&mut game, ORCS, SiteKind::MaraudingOrcs, &["Prowlers", "Wolf Riders"]);
        game.challenge(ORCS).unwrap();
        assert_eq!(game.combat_state().unwrap().selected().count(), 0);
        assert!(game.combat().next().is_err());

        // several enemies may be attacked together
        game.combat().set_enemy_selected(CombatEnemyId(0), true).unwrap();
        game.combat().set_enemy_selected(CombatEnemyId(1), true).unwrap();
        assert_eq!(game.combat_state().unwrap().selected().count(), 2);

        // but only one blocked at a time
        game.combat().skip().unwrap();
        game.combat().set_enemy_selected(CombatEnemyId(0), true).unwrap();
        game.combat().set_enemy_selected(CombatEnemyId(1), true).unwrap();
        let selected: Vec<_> = game.combat_state().unwrap().selected().map(|e| e.id).collect();
        assert_eq!(selected, vec![CombatEnemyId(1)]);
    }

    #[test]
    fn test_summoner_calls_enemy() {
        let mut game = Match::new(MatchConfig::solo(21));
        place(&mut game, ORCS, SiteKind::MaraudingOrcs, &["Orc Summoners"]);
        game.challenge(ORCS).unwrap();
        assert!(game.can_undo());
        game.combat().skip().unwrap();

        let enemy = &game.combat_state().unwrap().enemies[0];
        let summoned = enemy.summoned.as_ref().unwrap();
        assert_eq!(summoned.category, EnemyCategory::Dungeon);
        assert_eq!(enemy.damage, summoned.damage());

        // only what happened after the draw can be taken back
        game.undo().unwrap();
        assert_eq!(game.phase(), Phase::RangeAttack);
        assert!(game.combat_state().unwrap().enemies[0].summoned.is_some());
        assert!(!game.can_undo());
    }

    #[test]
    fn test_spell_reward() {
        let mut game = Match::new(MatchConfig::solo(21));
        let tower = HexCoord::new(3, 3);
        place(&mut game, tower, SiteKind::MageTower, &["Monks"]);
        game.combat().begin(tower, false).unwrap();
        game.combat().skip().unwrap();
        bank(&mut game, Effect::block(5));
        game.combat().next().unwrap();
        bank(&mut game, Effect::attack(5));
        game.combat().next().unwrap();

        assert_eq!(game.phase(), Phase::CombatRewards);
        assert_eq!(game.state().map.site_at(tower).unwrap().owner, Some(game.current()));
        game.combat().choose_reward_type(0).unwrap();
        let items = game.combat_state().unwrap().rewards[0].items.clone();
        assert!(!items.is_empty());
        let RewardItem::Card(spell) = items[0] else {
            panic!("spell rewards offer cards");
        };
        game.combat().choose_reward_item(0).unwrap();

        assert_eq!(game.current_player().deck[0], spell);
        assert_eq!(game.phase(), Phase::EndOfTurn);
        assert!(game.combat_state().unwrap().rewards.is_empty());
        game.end_turn().unwrap();
    }

    #[test]
    fn test_crystal_reward() {
        let choices = ScriptedChoices::new([Answer::Color(ManaColor::Red), Answer::Color(ManaColor::Red)]);
        let mut game = Match::with_choices(MatchConfig::solo(21), choices);
        let den = HexCoord::new(3, 3);
        place(&mut game, den, SiteKind::MonsterDen, &["Minotaur"]);
        game.combat().begin(den, false).unwrap();
        game.combat().skip().unwrap();
        bank(&mut game, Effect::block(5));
        game.combat().next().unwrap();
        bank(&mut game, Effect::attack(5));
        game.combat().next().unwrap();
        let fame = game.current_player().fame;

        game.combat().choose_reward_type(0).unwrap();
        let player = game.current_player();
        let crystals: u32 = player.crystals.iter().map(|&c| u32::from(c)).sum();
        assert_eq!(crystals + player.fame - fame, 2);
        assert_eq!(game.phase(), Phase::EndOfTurn);
    }

    #[test]
    fn test_failed_assault_retreats() {
        let mut game = Match::new(MatchConfig::solo(21));
        let keep = HexCoord::new(1, 1);
        place(&mut game, keep, SiteKind::Keep, &["Guardsmen"]);
        // the opening tiles may hold marauders next to the keep
        for coords in keep.neighbors() {
            if game.state().map.site_at(coords).map_or(false, Site::is_active) {
                let mut calm = Site::new(SiteKind::MaraudingOrcs);
                calm.enemies.clear();
                game.state_mut_unrecorded().map.set_site(coords, calm);
            }
        }
        game.action("setup", |m| {
            m.add_effect(&Effect::movement(5))?;
            m.edit_player(PlayerEdit::Position {
                before: HexCoord::ORIGIN,
                after: ORCS,
            })
        })
        .unwrap();
        game.move_to(keep).unwrap();
        assert_eq!(game.current_player().reputation, -1);
        assert_eq!(game.phase(), Phase::RangeAttack);

        game.combat().skip().unwrap();
        bank(&mut game, Effect::block(3));
        game.combat().next().unwrap();
        game.combat().skip().unwrap();
        assert_eq!(game.phase(), Phase::CombatEnd);
        assert_eq!(game.current_player().position, ORCS);
    }

    fn recruit(game: &mut Match, name: &str) {
        let unit = game.catalog().units.by_name(name).unwrap().id;
        game.action("recruit", |m| m.add_unit(UnitInstance::new(unit)))
            .unwrap();
    }

    fn wounds_in(game: &Match, pile: Pile) -> usize {
        let wound = game.catalog().wound();
        game.current_player().pile(pile).iter().filter(|&&c| c == wound).count()
    }

    fn play(game: &mut Match, effect: Effect) -> Result<()> {
        game.action("play", |m| m.gain_effect(&effect))
    }

    /// Fight the enemies named at the orc camp up to assigning damage.
    fn facing(enemies: &[&str]) -> Match {
        let mut game = Match::new(MatchConfig::solo(21));
        place(&mut game, ORCS, SiteKind::MaraudingOrcs, enemies);
        game.challenge(ORCS).unwrap();
        game.combat().skip().unwrap();
        game.combat().skip().unwrap();
        assert_eq!(game.phase(), Phase::AssignDamage);
        game
    }

    /// Like [`facing`], with `unit` ready to take the damage.
    fn with_unit(unit: &str, enemies: &[&str]) -> Match {
        let mut game = Match::new(MatchConfig::solo(21));
        recruit(&mut game, unit);
        place(&mut game, ORCS, SiteKind::MaraudingOrcs, enemies);
        game.challenge(ORCS).unwrap();
        game.combat().skip().unwrap();
        game.combat().skip().unwrap();
        assert_eq!(game.phase(), Phase::AssignDamage);
        game
    }

    /// Win a fight against prowlers and be owed `count` of `kind`.
    fn owed(kind: RewardKind, count: u32) -> Match {
        let mut game = prowlers();
        game.combat().skip().unwrap();
        bank(&mut game, Effect::block(4));
        game.combat().next().unwrap();
        bank(&mut game, Effect::attack(3));
        game.combat().next().unwrap();
        assert_eq!(game.phase(), Phase::CombatEnd);
        game.action("reward", |m| {
            m.edit_combat(CombatEdit::Rewards {
                before: Vector::new(),
                after: Vector::unit(CombatReward::new(kind, count)),
            })?;
            m.set_phase(Phase::CombatRewards)
        })
        .unwrap();
        game
    }

    #[test]
    fn test_spent_unit_takes_no_damage() {
        let mut game = prowlers();
        recruit(&mut game, "peasants");
        game.action("spend", |m| m.update_unit(0, |u| u.ready = false))
            .unwrap();
        game.combat().skip().unwrap();
        game.combat().skip().unwrap();
        assert_eq!(game.phase(), Phase::AssignDamage);

        let err = game.combat().assign_damage_to_unit(0).unwrap_err();
        assert!(err.to_string().contains("Cannot assign damage to this unit"));
        assert_eq!(game.current_player().units[0].wounds, 0);
        assert_eq!(game.combat_state().unwrap().enemies[0].damage, 4);
    }

    #[test]
    fn test_fortified_enemy_needs_siege() {
        let mut game = Match::new(MatchConfig::solo(21));
        place(&mut game, ORCS, SiteKind::MaraudingOrcs, &["Diggers"]);
        game.challenge(ORCS).unwrap();
        assert_eq!(game.fortification_level(), 1);

        let err = play(&mut game, Effect::attack_with(3, Element::Physical, AttackRange::Ranged)).unwrap_err();
        assert!(err.to_string().contains("Must play siege attack"));
        assert!(play(&mut game, Effect::attack(3)).is_err());
        play(&mut game, Effect::attack_with(3, Element::Physical, AttackRange::Siege)).unwrap();
        game.combat().next().unwrap();
        assert_eq!(game.phase(), Phase::CombatEnd);
    }

    #[test]
    fn test_twice_fortified_rejects_ranged_attacks() {
        let mut game = Match::new(MatchConfig::solo(21));
        let keep = HexCoord::new(3, 3);
        place(&mut game, keep, SiteKind::Keep, &["Guardsmen"]);
        game.combat().begin(keep, false).unwrap();
        assert_eq!(game.phase(), Phase::RangeAttack);
        assert_eq!(game.fortification_level(), 2);

        for range in [AttackRange::Ranged, AttackRange::Siege] {
            let err = play(&mut game, Effect::attack_with(7, Element::Physical, range)).unwrap_err();
            assert!(err.to_string().contains("twice fortified"));
        }

        play(&mut game, Effect::LosesFortification).unwrap();
        assert_eq!(game.fortification_level(), 0);
        play(&mut game, Effect::attack_with(7, Element::Physical, AttackRange::Ranged)).unwrap();
    }

    #[test]
    fn test_poison_wounds_discard_pile() {
        let mut game = facing(&["Cursed Hags"]);
        game.combat().next().unwrap();
        // 3 damage against armor 2, doubled into the discard pile
        assert_eq!(wounds_in(&game, Pile::Hand), 2);
        assert_eq!(wounds_in(&game, Pile::Discard), 2);
        assert_eq!(game.combat_state().unwrap().hero_wounds, 2);
    }

    #[test]
    fn test_poison_wounds_unit_twice() {
        let mut game = with_unit("peasants", &["Cursed Hags"]);
        game.combat().assign_damage_to_unit(0).unwrap();
        let unit = game.current_player().units[0];
        assert_eq!(unit.wounds, 2);
        assert!(unit.protected);
        assert_eq!(game.phase(), Phase::Attack);
        assert_eq!(wounds_in(&game, Pile::Hand), 0);
    }

    #[test]
    fn test_paralyze_knocks_out_hero() {
        let mut game = facing(&["Medusa"]);
        game.combat().next().unwrap();
        let wound = game.catalog().wound();
        let hand = &game.current_player().hand;
        assert_eq!(hand.len(), 3);
        assert!(hand.iter().all(|&c| c == wound));
        assert_eq!(game.current_player().discard.len(), 5);
    }

    #[test]
    fn test_paralyze_destroys_unit() {
        let mut game = with_unit("peasants", &["Medusa"]);
        game.combat().assign_damage_to_unit(0).unwrap();
        assert!(game.current_player().units.is_empty());
        // armor 3 of the 6 damage was absorbed
        assert_eq!(game.combat_state().unwrap().enemies[0].damage, 3);
        assert_eq!(game.phase(), Phase::AssignDamage);
    }

    #[test]
    fn test_wounds_up_to_hand_limit_knock_out() {
        let mut game = facing(&["Prowlers", "Werewolf"]);
        game.combat().set_enemy_selected(CombatEnemyId(0), true).unwrap();
        game.combat().next().unwrap();
        assert_eq!(game.combat_state().unwrap().hero_wounds, 2);
        assert_eq!(game.current_player().hand.len(), 7);

        // the werewolf is the only enemy left to deal damage
        assert!(game.combat_state().unwrap().enemies[1].is_selected);
        game.combat().next().unwrap();
        assert_eq!(game.combat_state().unwrap().hero_wounds, 6);
        let hand = &game.current_player().hand;
        assert_eq!(hand.len(), 6);
        assert_eq!(wounds_in(&game, Pile::Hand), 6);
    }

    #[test]
    fn test_resistant_unit_absorbs_twice() {
        let mut game = with_unit("peasants", &["Werewolf"]);
        game.combat().assign_damage_to_unit(0).unwrap();
        assert_eq!(game.current_player().units[0].wounds, 1);
        assert_eq!(game.combat_state().unwrap().enemies[0].damage, 4);

        let mut game = with_unit("guardian_golems", &["Werewolf"]);
        game.combat().assign_damage_to_unit(0).unwrap();
        assert_eq!(game.current_player().units[0].wounds, 1);
        // 7 - 3 for resisting, then 3 more for armor
        assert_eq!(game.combat_state().unwrap().enemies[0].damage, 1);
    }

    #[test]
    fn test_attack_kills_two_enemies() {
        let mut game = Match::new(MatchConfig::solo(21));
        place(&mut game, ORCS, SiteKind::MaraudingOrcs, &["Prowlers", "Prowlers"]);
        game.challenge(ORCS).unwrap();
        game.combat().skip().unwrap();
        for _ in 0..2 {
            let active = game.combat_state().unwrap().active(Phase::Block);
            game.combat().set_enemy_selected(active[0], true).unwrap();
            bank(&mut game, Effect::block(4));
            game.combat().next().unwrap();
        }
        assert_eq!(game.phase(), Phase::Attack);

        game.combat().set_enemy_selected(CombatEnemyId(0), true).unwrap();
        game.combat().set_enemy_selected(CombatEnemyId(1), true).unwrap();
        // 5 is short of the combined armor
        bank(&mut game, Effect::attack(5));
        game.combat().next().unwrap();
        assert_eq!(game.combat_state().unwrap().enemies.iter().filter(|e| e.is_alive).count(), 2);

        game.combat().set_enemy_selected(CombatEnemyId(0), true).unwrap();
        game.combat().set_enemy_selected(CombatEnemyId(1), true).unwrap();
        bank(&mut game, Effect::attack(6));
        game.combat().next().unwrap();
        assert_eq!(game.phase(), Phase::CombatEnd);
        assert_eq!(game.current_player().fame, 4);
        assert!(!game.state().map.site_at(ORCS).unwrap().is_active());
    }

    #[test]
    fn test_unit_reward_ends_turn() {
        let mut game = owed(RewardKind::Unit, 1);
        game.combat().choose_reward_type(0).unwrap();
        let items = game.combat_state().unwrap().rewards[0].items.clone();
        assert_eq!(items.len(), game.state().offers.units().count());
        assert_eq!(game.phase(), Phase::CombatRewards);
        let RewardItem::Unit(unit) = items[0] else {
            panic!("unit rewards offer units");
        };

        game.combat().choose_reward_item(0).unwrap();
        assert_eq!(game.current_player().units[0].unit, unit);
        assert_eq!(game.phase(), Phase::EndOfTurn);
        assert!(game.combat_state().unwrap().rewards.is_empty());
    }

    #[test]
    fn test_second_unit_still_owed() {
        let mut game = owed(RewardKind::Unit, 2);
        game.combat().choose_reward_type(0).unwrap();
        game.combat().choose_reward_item(0).unwrap();

        assert_eq!(game.phase(), Phase::CombatRewards);
        assert_eq!(game.current_player().units.len(), 1);
        let combat = game.combat_state().unwrap();
        assert_eq!(combat.current_reward, Some(0));
        assert_eq!(combat.rewards[0].count, 1);
        let offered: Vec<RewardItem> = game.state().offers.units().map(RewardItem::Unit).collect();
        assert_eq!(combat.rewards[0].items.iter().copied().collect::<Vec<_>>(), offered);
    }
}
