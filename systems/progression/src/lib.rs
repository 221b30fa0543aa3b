#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Upgrade offers and the effects of choosing them.
//!
//! Offers are drawn without replacement from the upgrades that have not hit
//! their cap. A choice is validated against the current offers and ledger
//! before it is translated into an [`UpgradeEffect`].

use fish_survivor_core::{UpgradeId, UpgradeLedger, UpgradeOffer, WeaponKind};
use rand::Rng;
use thiserror::Error;

/// Multiplier applied to player speed per speed upgrade.
pub const SPEED_FACTOR: f32 = 1.1;
/// Multiplier applied to weapon damage per damage upgrade.
pub const DAMAGE_FACTOR: f32 = 1.15;
/// Fraction of maximum health added per health upgrade.
pub const HEALTH_FRACTION: f32 = 0.2;
/// Multiplier applied to weapon cooldowns per attack speed upgrade.
pub const COOLDOWN_FACTOR: f32 = 0.9;

/// Reasons an upgrade choice is rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum UpgradeError {
    /// The simulation is not waiting for an upgrade choice.
    #[error("no upgrade choice is pending")]
    NotChoosing,
    /// The upgrade is not among the current offers.
    #[error("{0:?} is not on offer")]
    NotOffered(UpgradeId),
    /// The upgrade already reached its maximum level.
    #[error("{0:?} is already at its maximum level")]
    AtMaxLevel(UpgradeId),
}

/// Consequence of applying an upgrade, beyond bumping its ledger level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UpgradeEffect {
    /// Multiply the player's movement speed.
    ScalePlayerSpeed(f32),
    /// Multiply the damage of every held weapon.
    ScaleWeaponDamage(f32),
    /// Raise maximum health by a fraction and heal by the same amount.
    GrowMaxHealth(f32),
    /// Multiply the cooldown of every held weapon.
    ScaleWeaponCooldown(f32),
    /// Add a weapon to the arsenal.
    UnlockWeapon(WeaponKind),
    /// Nothing beyond the ledger; the world derives the effect from the level.
    LedgerOnly,
}

/// Draws up to `count` distinct eligible upgrades, keeping catalogue order
/// among the remaining pool between draws.
pub fn draw_offers<R: Rng + ?Sized>(
    ledger: &UpgradeLedger,
    count: usize,
    rng: &mut R,
) -> Vec<UpgradeOffer> {
    let mut pool: Vec<UpgradeId> = ledger.eligible().collect();
    let mut offers = Vec::with_capacity(count.min(pool.len()));
    while offers.len() < count && !pool.is_empty() {
        let upgrade = pool.remove(rng.gen_range(0..pool.len()));
        offers.push(UpgradeOffer {
            upgrade,
            current_level: ledger.level(upgrade),
        });
    }
    offers
}

/// Confirms that `upgrade` may be applied given the pending `offers`.
pub fn validate_choice(
    ledger: &UpgradeLedger,
    offers: &[UpgradeOffer],
    upgrade: UpgradeId,
) -> Result<(), UpgradeError> {
    if offers.is_empty() {
        return Err(UpgradeError::NotChoosing);
    }
    if !offers.iter().any(|offer| offer.upgrade == upgrade) {
        return Err(UpgradeError::NotOffered(upgrade));
    }
    if ledger.is_maxed(upgrade) {
        return Err(UpgradeError::AtMaxLevel(upgrade));
    }
    Ok(())
}

/// Effect of `upgrade` reaching `new_level`.
///
/// Weapon upgrades only unlock their weapon on the first level.
#[must_use]
pub const fn effect_of(upgrade: UpgradeId, new_level: u8) -> UpgradeEffect {
    match upgrade {
        UpgradeId::Speed => UpgradeEffect::ScalePlayerSpeed(SPEED_FACTOR),
        UpgradeId::Damage => UpgradeEffect::ScaleWeaponDamage(DAMAGE_FACTOR),
        UpgradeId::Health => UpgradeEffect::GrowMaxHealth(HEALTH_FRACTION),
        UpgradeId::AttackSpeed => UpgradeEffect::ScaleWeaponCooldown(COOLDOWN_FACTOR),
        UpgradeId::Pickup => UpgradeEffect::LedgerOnly,
        UpgradeId::BubbleTrap | UpgradeId::WaterWave | UpgradeId::FishingNet => {
            match (upgrade.unlocks(), new_level) {
                (Some(weapon), 1) => UpgradeEffect::UnlockWeapon(weapon),
                _ => UpgradeEffect::LedgerOnly,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn maxed(ledger: &mut UpgradeLedger, upgrade: UpgradeId) {
        for _ in 0..upgrade.max_level() {
            let _ = ledger.record(upgrade);
        }
    }

    #[test]
    fn offers_are_distinct_and_eligible() {
        let mut ledger = UpgradeLedger::default();
        maxed(&mut ledger, UpgradeId::Speed);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        for _ in 0..200 {
            let offers = draw_offers(&ledger, 3, &mut rng);
            assert_eq!(offers.len(), 3);
            assert!(offers.iter().all(|offer| offer.upgrade != UpgradeId::Speed));
            for (index, offer) in offers.iter().enumerate() {
                assert!(offers[index + 1..]
                    .iter()
                    .all(|other| other.upgrade != offer.upgrade));
            }
        }
    }

    #[test]
    fn offers_shrink_when_few_upgrades_remain() {
        let mut ledger = UpgradeLedger::default();
        for upgrade in UpgradeId::ALL.into_iter().skip(2) {
            maxed(&mut ledger, upgrade);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut offers = draw_offers(&ledger, 3, &mut rng);
        offers.sort_by_key(|offer| offer.upgrade);
        assert_eq!(
            offers.iter().map(|offer| offer.upgrade).collect::<Vec<_>>(),
            vec![UpgradeId::Speed, UpgradeId::Damage]
        );

        maxed(&mut ledger, UpgradeId::Speed);
        maxed(&mut ledger, UpgradeId::Damage);
        assert!(draw_offers(&ledger, 3, &mut rng).is_empty());
    }

    #[test]
    fn offers_report_current_level() {
        let mut ledger = UpgradeLedger::default();
        for upgrade in UpgradeId::ALL {
            let _ = ledger.record(upgrade);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for offer in draw_offers(&ledger, 3, &mut rng) {
            assert_eq!(offer.current_level, 1);
            assert_eq!(offer.next_level(), 2);
        }
    }

    #[test]
    fn choice_validation_rejects_unknown_and_capped_upgrades() {
        let mut ledger = UpgradeLedger::default();
        let offers = [
            UpgradeOffer {
                upgrade: UpgradeId::Damage,
                current_level: 0,
            },
            UpgradeOffer {
                upgrade: UpgradeId::WaterWave,
                current_level: 0,
            },
        ];

        assert_eq!(
            validate_choice(&ledger, &[], UpgradeId::Damage),
            Err(UpgradeError::NotChoosing)
        );
        assert_eq!(
            validate_choice(&ledger, &offers, UpgradeId::Health),
            Err(UpgradeError::NotOffered(UpgradeId::Health))
        );
        assert_eq!(validate_choice(&ledger, &offers, UpgradeId::Damage), Ok(()));

        maxed(&mut ledger, UpgradeId::WaterWave);
        assert_eq!(
            validate_choice(&ledger, &offers, UpgradeId::WaterWave),
            Err(UpgradeError::AtMaxLevel(UpgradeId::WaterWave))
        );
    }

    #[test]
    fn weapon_upgrades_unlock_only_on_first_level() {
        assert_eq!(
            effect_of(UpgradeId::FishingNet, 1),
            UpgradeEffect::UnlockWeapon(WeaponKind::FishingNet)
        );
        assert_eq!(effect_of(UpgradeId::FishingNet, 2), UpgradeEffect::LedgerOnly);
        assert_eq!(
            effect_of(UpgradeId::Health, 3),
            UpgradeEffect::GrowMaxHealth(HEALTH_FRACTION)
        );
    }
}
