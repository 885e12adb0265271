//! Pure financial projections.
//!
//! RULE: No state, no I/O, no validation. Inputs are assumed finite;
//! a non-finite result is returned as-is for the caller to deal with.
//! The only guarded cases are the two zero-rate divisions.

use crate::catalog::Frequency;
use serde::{Deserialize, Serialize};

/// `pv * (1 + rate)^years`
pub fn future_value(present_value: f64, rate: f64, years: f64) -> f64 {
    present_value * (1.0 + rate).powf(years)
}

/// Future value of a level payment stream.
/// A zero rate falls back to `payment * periods`.
pub fn future_value_annuity(payment: f64, rate_per_period: f64, periods: f64) -> f64 {
    if rate_per_period == 0.0 {
        return payment * periods;
    }
    payment * (((1.0 + rate_per_period).powf(periods) - 1.0) / rate_per_period)
}

pub fn annual_cost(cost: f64, frequency: Frequency) -> f64 {
    cost * frequency.multiplier()
}

pub fn total_cost(cost: f64, frequency: Frequency, years: f64) -> f64 {
    annual_cost(cost, frequency) * years
}

/// Value of a future `amount` in today's money.
pub fn inflation_adjusted(amount: f64, years: f64, inflation_rate: f64) -> f64 {
    amount / (1.0 + inflation_rate).powf(years)
}

/// What `annual_amount` would grow to if contributed monthly
/// (`annual/12` each month at `rate/12`) for `years`.
pub fn opportunity_cost(annual_amount: f64, years: f64, return_rate: f64) -> f64 {
    let monthly_amount = annual_amount / 12.0;
    let monthly_rate = return_rate / 12.0;
    future_value_annuity(monthly_amount, monthly_rate, years * 12.0)
}

pub fn car_depreciation(initial_value: f64, years: f64, depreciation_rate: f64) -> f64 {
    initial_value * (1.0 - depreciation_rate).powf(years)
}

pub fn home_appreciation(initial_value: f64, years: f64, appreciation_rate: f64) -> f64 {
    initial_value * (1.0 + appreciation_rate).powf(years)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarOwnershipCost {
    pub number_of_cars:  u32,
    pub total_purchases: f64,
    pub final_car_value: f64,
    pub net_cost:        f64,
}

/// Cost of buying a new car every `years_per_car` over `total_years`,
/// net of what the last car is still worth at the end.
pub fn car_ownership_cost(
    purchase_price: f64,
    years_per_car: u32,
    total_years: u32,
    depreciation_rate: f64,
) -> CarOwnershipCost {
    let per_car = years_per_car.max(1);
    let number_of_cars = total_years.div_ceil(per_car);
    let total_purchases = purchase_price * f64::from(number_of_cars);

    let held = match total_years % per_car {
        0 => per_car,
        rem => rem,
    };
    let final_car_value = car_depreciation(purchase_price, f64::from(held), depreciation_rate);

    CarOwnershipCost {
        number_of_cars,
        total_purchases,
        final_car_value,
        net_cost: total_purchases - final_car_value,
    }
}

/// Monthly payment on a fully amortising loan.
/// A zero rate falls back to `principal / (years * 12)`.
pub fn mortgage_payment(principal: f64, annual_rate: f64, years: f64) -> f64 {
    let monthly_rate = annual_rate / 12.0;
    let payments = years * 12.0;

    if monthly_rate == 0.0 {
        return principal / payments;
    }

    let growth = (1.0 + monthly_rate).powf(payments);
    principal * (monthly_rate * growth) / (growth - 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortgageBreakdown {
    pub down_payment:    f64,
    pub principal:       f64,
    pub monthly_payment: f64,
    pub total_payments:  f64,
    pub total_interest:  f64,
    pub total_cost:      f64,
}

pub fn mortgage_breakdown(
    home_price: f64,
    down_payment_fraction: f64,
    annual_rate: f64,
    years: f64,
) -> MortgageBreakdown {
    let down_payment = home_price * down_payment_fraction;
    let principal = home_price - down_payment;
    let monthly_payment = mortgage_payment(principal, annual_rate, years);
    let total_payments = monthly_payment * years * 12.0;

    MortgageBreakdown {
        down_payment,
        principal,
        monthly_payment,
        total_payments,
        total_interest: total_payments - principal,
        total_cost:     total_payments + down_payment,
    }
}
