use log::debug;
use rust_decimal::Decimal;

use crate::errors::{Result, ValidationError};
use crate::portfolio::holdings::Holding;
use crate::portfolio::rebalance::{EqualizationPlan, InstrumentTopUp, InstrumentValue};
use crate::transactions::Category;
use crate::utils::decimal_utils::{apportion_cents, round_amount, round_units};

/// Splits `inflow` across instruments so they approach equal value.
///
/// The blended target is `(active value + inflow) / |active|`. Instruments
/// already above it are excluded and the target is recomputed over the rest
/// until no active instrument exceeds it. Each remaining instrument gets
/// `target − value`; excluded ones get 0. Amounts are floored to cents and
/// the missing cents go to the largest remainders, so top-ups are never
/// negative and sum to the inflow.
pub fn equalize_inflow(instruments: &[InstrumentValue], inflow: Decimal) -> Result<EqualizationPlan> {
    let inflow = round_amount(inflow);
    if inflow <= Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!(
            "Inflow must be positive, got {}",
            inflow
        ))
        .into());
    }

    if instruments.is_empty() {
        return Ok(EqualizationPlan {
            inflow,
            target_per_instrument: Decimal::ZERO,
            top_ups: Vec::new(),
            undeployed: inflow,
        });
    }

    let mut excluded = vec![false; instruments.len()];
    let mut target = Decimal::ZERO;

    // Each pass excludes at least one instrument or stops.
    for _ in 0..instruments.len() {
        let mut active_sum = Decimal::ZERO;
        let mut active_count = 0u32;
        for (idx, instrument) in instruments.iter().enumerate() {
            if !excluded[idx] {
                active_sum += instrument.current_value;
                active_count += 1;
            }
        }
        if active_count == 0 {
            break;
        }
        target = (active_sum + inflow) / Decimal::from(active_count);

        let mut newly_excluded = false;
        for (idx, instrument) in instruments.iter().enumerate() {
            if !excluded[idx] && instrument.current_value > target {
                excluded[idx] = true;
                newly_excluded = true;
            }
        }
        if !newly_excluded {
            break;
        }
        debug!("Recomputing equalization target after exclusions (was {})", target);
    }

    let raw: Vec<Decimal> = instruments
        .iter()
        .enumerate()
        .map(|(idx, instrument)| {
            if excluded[idx] {
                Decimal::ZERO
            } else {
                (target - instrument.current_value).max(Decimal::ZERO)
            }
        })
        .collect();

    // Largest shortfall takes any cent no remainder claims.
    let largest = raw
        .iter()
        .enumerate()
        .fold(0, |best, (idx, amount)| if *amount > raw[best] { idx } else { best });
    let amounts = apportion_cents(&raw, inflow, largest, |idx, _| !excluded[idx]);

    let top_ups = instruments
        .iter()
        .zip(amounts)
        .enumerate()
        .map(|(idx, (instrument, amount))| InstrumentTopUp {
            instrument_code: instrument.instrument_code.clone(),
            display_name: instrument.display_name.clone(),
            current_value: instrument.current_value,
            amount,
            suggested_units: instrument
                .current_price
                .filter(|p| *p > Decimal::ZERO)
                .map(|p| round_units(amount / p)),
            excluded: excluded[idx],
        })
        .collect();

    Ok(EqualizationPlan {
        inflow,
        target_per_instrument: target,
        top_ups,
        undeployed: Decimal::ZERO,
    })
}

/// Equalizes `inflow` across the active, priced holdings of one category.
pub fn plan_category_inflow(
    holdings: &[Holding],
    category: Category,
    inflow: Decimal,
) -> Result<EqualizationPlan> {
    let instruments: Vec<InstrumentValue> = holdings
        .iter()
        .filter(|h| h.category == category && h.is_active())
        .filter_map(|h| match h.market_value {
            Some(value) => Some(InstrumentValue {
                instrument_code: h.instrument_code.clone(),
                display_name: h.display_name.clone(),
                current_value: value,
                current_price: h.current_price,
            }),
            None => {
                debug!("Skipping unpriced holding {} in inflow plan", h.instrument_code);
                None
            }
        })
        .collect();

    equalize_inflow(&instruments, inflow)
}
