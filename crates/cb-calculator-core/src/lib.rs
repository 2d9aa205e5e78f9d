//! Calculator controller.
//!
//! User actions arrive as [`Intent`]s, [`reduce`] folds them into the
//! [`OrderConfiguration`], and [`Calculator`] reprices after every step.
//! Submitting goes through [`Calculator::submit`] or, when the caller cannot
//! hold the controller across an await, [`Calculator::prepare_estimate`]
//! followed by [`send_estimate`].

pub mod config;

pub use config::{CalculatorConfig, ConfigError, env_var_name};

use cb_api_types::{
    ColorRecord, EstimateIcing, EstimateIcingPart, EstimateReceipt, EstimateRequest,
    EstimateTopping, IcingPart, ShadeTier, ToppingRecord,
};
use cb_catalog_client::EstimateSink;
use cb_pricing::{
    FlavorSelection, IcingChoice, OrderConfiguration, PriceBreakdown, PricingPolicy,
    PricingPolicyKind, ShadeSelection, SizeSelection,
};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SelectBaseCake(Option<u32>),
    SelectSize(SizeSelection),
    SetLayers(u32),
    SelectFlavor(Option<FlavorSelection>),
    /// Numeric quantity input.
    SetToppingQuantity { topping: ToppingRecord, quantity: u32 },
    /// Increment/decrement buttons.
    AdjustTopping { topping: ToppingRecord, delta: i32 },
    /// `None` clears the part.
    SelectIcingColor {
        part: IcingPart,
        color: Option<ColorRecord>,
    },
    SelectShade { part: IcingPart, tier: ShadeTier },
    ToggleMessage(bool),
    ToggleRush(bool),
    Submit,
}

/// Applies one intent. `Submit` leaves the configuration untouched.
pub fn reduce(mut config: OrderConfiguration, intent: &Intent) -> OrderConfiguration {
    match intent {
        Intent::SelectBaseCake(cake_id) => config.base_cake_id = *cake_id,
        Intent::SelectSize(size) => config.size = Some(size.clone()),
        Intent::SetLayers(layers) => config.layers = *layers,
        Intent::SelectFlavor(flavor) => config.flavor = flavor.clone(),
        Intent::SetToppingQuantity { topping, quantity } => {
            config.set_topping_quantity(topping, *quantity);
        }
        Intent::AdjustTopping { topping, delta } => config.adjust_topping(topping, *delta),
        Intent::SelectIcingColor { part, color } => {
            let slot = config.icing.slot_mut(*part);
            match color {
                None => *slot = None,
                Some(color) => {
                    if let Some(choice) = slot.as_mut() {
                        choice.color_id = color.color_id;
                        choice.color_name = color.color_name.clone();
                    } else {
                        *slot = Some(IcingChoice::from_color(color));
                    }
                }
            }
        }
        Intent::SelectShade { part, tier } => {
            if let Some(choice) = config.icing.slot_mut(*part).as_mut() {
                choice.shade = Some(ShadeSelection::for_tier(*tier));
            }
        }
        Intent::ToggleMessage(on) => config.has_message = *on,
        Intent::ToggleRush(on) => config.is_rush = *on,
        Intent::Submit => {}
    }
    config
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a cake size")]
    MissingSize,
    #[error("Please select a flavor")]
    MissingFlavor,
    #[error("Please choose a shade for the base icing")]
    MissingBaseIcingShade,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved(EstimateReceipt),
    /// Validation failed; nothing was sent.
    Rejected(ValidationError),
    /// The backend could not be reached or refused the estimate.
    Failed(String),
}

/// What the caller must do after a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Render(PriceBreakdown),
    Submit(Result<EstimateRequest, ValidationError>),
}

pub struct Calculator {
    config: OrderConfiguration,
    policy: Box<dyn PricingPolicy>,
    breakdown: PriceBreakdown,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::with_kind(PricingPolicyKind::default())
    }
}

impl Calculator {
    pub fn new(policy: Box<dyn PricingPolicy>) -> Self {
        let config = OrderConfiguration::new();
        let breakdown = policy.price(&config);
        Self {
            config,
            policy,
            breakdown,
        }
    }

    pub fn with_kind(kind: PricingPolicyKind) -> Self {
        Self::new(kind.build())
    }

    pub fn configuration(&self) -> &OrderConfiguration {
        &self.config
    }

    /// The breakdown currently on screen.
    pub fn breakdown(&self) -> PriceBreakdown {
        self.breakdown
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn dispatch(&mut self, intent: Intent) -> Effect {
        if intent == Intent::Submit {
            return Effect::Submit(self.prepare_estimate());
        }

        debug!(?intent, "dispatch");
        let config = std::mem::take(&mut self.config);
        self.config = reduce(config, &intent);
        self.breakdown = self.policy.price(&self.config);
        Effect::Render(self.breakdown)
    }

    /// Checks, in order: size, flavor, then base icing shade when the policy
    /// prices icing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.config.size.is_none() {
            return Err(ValidationError::MissingSize);
        }
        if self.config.flavor.is_none() {
            return Err(ValidationError::MissingFlavor);
        }
        if self.policy.requires_base_icing_shade()
            && self
                .config
                .icing
                .get(IcingPart::Base)
                .and_then(|choice| choice.shade)
                .is_none()
        {
            return Err(ValidationError::MissingBaseIcingShade);
        }
        Ok(())
    }

    /// Builds the payload from the current configuration and the displayed
    /// total.
    pub fn prepare_estimate(&self) -> Result<EstimateRequest, ValidationError> {
        self.validate()?;
        let (Some(size), Some(flavor)) = (&self.config.size, &self.config.flavor) else {
            return Err(ValidationError::MissingSize);
        };

        let icing_part = |part: IcingPart| {
            self.config.icing.get(part).map(|choice| EstimateIcingPart {
                color_id: choice.color_id,
                color_name: choice.color_name.clone(),
                shade: choice.shade.map(|shade| shade.tier),
                multiplier: choice.shade.map(|shade| shade.multiplier),
            })
        };

        Ok(EstimateRequest {
            cake_id: self.config.base_cake_id,
            size: size.name.clone(),
            num_layers: self.config.layers,
            flavor_id: flavor.id,
            toppings: self
                .config
                .toppings
                .iter()
                .map(|line| EstimateTopping {
                    id: line.id,
                    name: line.name.clone(),
                    price: line.price,
                    quantity: line.quantity,
                })
                .collect(),
            icing: EstimateIcing {
                base: icing_part(IcingPart::Base),
                sides: icing_part(IcingPart::Sides),
                other: icing_part(IcingPart::Other),
            },
            has_message: self.config.has_message,
            is_rush: self.config.is_rush,
            total_price: self.breakdown.total,
        })
    }

    pub async fn submit<S: EstimateSink + ?Sized>(&self, sink: &S) -> SubmitOutcome {
        send_estimate(sink, self.prepare_estimate()).await
    }
}

/// Sends a prepared estimate. Rejected payloads never reach the sink.
pub async fn send_estimate<S: EstimateSink + ?Sized>(
    sink: &S,
    prepared: Result<EstimateRequest, ValidationError>,
) -> SubmitOutcome {
    let request = match prepared {
        Ok(request) => request,
        Err(reason) => {
            debug!(%reason, "estimate rejected before sending");
            return SubmitOutcome::Rejected(reason);
        }
    };

    match sink.save_estimate(&request).await {
        Ok(receipt) => {
            info!(estimate_id = ?receipt.estimate_id, "estimate saved");
            SubmitOutcome::Saved(receipt)
        }
        Err(err) => {
            warn!("failed to save estimate: {err:#}");
            SubmitOutcome::Failed(format!("{err:#}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use cb_catalog_client::Catalog;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSink {
        fail: bool,
        received: RefCell<Vec<EstimateRequest>>,
    }

    #[async_trait(?Send)]
    impl EstimateSink for RecordingSink {
        async fn save_estimate(&self, request: &EstimateRequest) -> anyhow::Result<EstimateReceipt> {
            self.received.borrow_mut().push(request.clone());
            if self.fail {
                return Err(anyhow!("connection reset"));
            }
            Ok(EstimateReceipt {
                estimate_id: Some(format!("est-{}", self.received.borrow().len())),
            })
        }
    }

    fn size(catalog: &Catalog, name: &str) -> Intent {
        Intent::SelectSize(SizeSelection::from(catalog.size(name).unwrap()))
    }

    fn flavor(catalog: &Catalog, id: u32) -> Intent {
        Intent::SelectFlavor(catalog.flavor(id).map(FlavorSelection::from))
    }

    /// 5x3, three layers of vanilla, two cherries.
    fn reference_order(calc: &mut Calculator, catalog: &Catalog) {
        calc.dispatch(size(catalog, "5x3"));
        calc.dispatch(Intent::SetLayers(3));
        calc.dispatch(flavor(catalog, 2));
        calc.dispatch(Intent::SetToppingQuantity {
            topping: catalog.topping(1).unwrap().clone(),
            quantity: 2,
        });
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    #[test]
    fn every_intent_reprices_immediately() {
        let catalog = Catalog::fallback();
        let mut calc = Calculator::default();
        assert_eq!(calc.breakdown().total, Decimal::ZERO);

        let Effect::Render(after_size) = calc.dispatch(size(&catalog, "5x3")) else {
            panic!("size selection should render");
        };
        assert_eq!(after_size.total, dec!(300));

        reference_order(&mut calc, &catalog);
        assert_eq!(calc.breakdown().total, dec!(460.00));
    }

    #[test]
    fn scaled_policy_prices_reference_order() {
        let catalog = Catalog::fallback();
        let mut calc = Calculator::with_kind(PricingPolicyKind::ScaledBase);
        reference_order(&mut calc, &catalog);
        assert_eq!(calc.breakdown().total, dec!(500.00));
        assert_eq!(calc.policy_name(), "scaled");
    }

    #[test]
    fn selecting_a_size_replaces_the_previous_one() {
        let catalog = Catalog::fallback();
        let mut calc = Calculator::default();
        calc.dispatch(size(&catalog, "4x3"));
        calc.dispatch(size(&catalog, "6x3"));

        let selected = calc.configuration().size.as_ref().unwrap();
        assert_eq!(selected.name, "6x3");
        assert_eq!(calc.breakdown().base, dec!(400));
    }

    #[test]
    fn topping_buttons_clamp_and_remove_at_zero() {
        let catalog = Catalog::fallback();
        let sprinkles = catalog.topping(4).unwrap().clone();
        let mut calc = Calculator::default();

        for _ in 0..11 {
            calc.dispatch(Intent::AdjustTopping {
                topping: sprinkles.clone(),
                delta: 1,
            });
        }
        assert_eq!(calc.configuration().topping_quantity(4), 10);
        assert_eq!(calc.breakdown().toppings, dec!(100));

        for _ in 0..10 {
            calc.dispatch(Intent::AdjustTopping {
                topping: sprinkles.clone(),
                delta: -1,
            });
        }
        assert!(calc.configuration().toppings.is_empty());

        calc.dispatch(Intent::AdjustTopping {
            topping: sprinkles,
            delta: -1,
        });
        assert!(calc.configuration().toppings.is_empty());
    }

    #[test]
    fn icing_color_then_shade_lifecycle() {
        let catalog = Catalog::fallback();
        let red = catalog.color(1).unwrap().clone();
        let blue = catalog.color(3).unwrap().clone();
        let mut calc = Calculator::default();

        // A shade for a part with no color is ignored.
        calc.dispatch(Intent::SelectShade {
            part: IcingPart::Sides,
            tier: ShadeTier::Dark,
        });
        assert!(calc.configuration().icing.sides.is_none());

        calc.dispatch(Intent::SelectIcingColor {
            part: IcingPart::Base,
            color: Some(red),
        });
        let base = calc.configuration().icing.base.clone().unwrap();
        assert_eq!(base.color_name, "Red");
        assert!(base.shade.is_none());
        assert_eq!(calc.breakdown().icing, Decimal::ZERO);

        calc.dispatch(Intent::SelectShade {
            part: IcingPart::Base,
            tier: ShadeTier::Medium,
        });
        assert_eq!(calc.breakdown().icing, dec!(62.50));

        // Recoloring keeps the chosen shade.
        calc.dispatch(Intent::SelectIcingColor {
            part: IcingPart::Base,
            color: Some(blue),
        });
        let base = calc.configuration().icing.base.clone().unwrap();
        assert_eq!(base.color_id, 3);
        assert_eq!(base.shade.map(|s| s.tier), Some(ShadeTier::Medium));

        calc.dispatch(Intent::SelectIcingColor {
            part: IcingPart::Base,
            color: None,
        });
        assert!(calc.configuration().icing.base.is_none());
        assert_eq!(calc.breakdown().icing, Decimal::ZERO);
    }

    #[test]
    fn reduce_is_pure_for_submit() {
        let config = OrderConfiguration::new();
        assert_eq!(reduce(config.clone(), &Intent::Submit), config);
    }

    #[tokio::test]
    async fn submit_rejects_in_order_without_network() -> anyhow::Result<()> {
        init_tracing();
        let catalog = Catalog::fallback();
        let sink = RecordingSink::default();
        let mut calc = Calculator::default();

        assert_eq!(
            calc.submit(&sink).await,
            SubmitOutcome::Rejected(ValidationError::MissingSize)
        );

        calc.dispatch(size(&catalog, "5x3"));
        assert_eq!(
            calc.submit(&sink).await,
            SubmitOutcome::Rejected(ValidationError::MissingFlavor)
        );

        calc.dispatch(flavor(&catalog, 1));
        calc.dispatch(Intent::SelectIcingColor {
            part: IcingPart::Base,
            color: catalog.color(2).cloned(),
        });
        assert_eq!(
            calc.submit(&sink).await,
            SubmitOutcome::Rejected(ValidationError::MissingBaseIcingShade)
        );

        assert!(sink.received.borrow().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn scaled_policy_does_not_require_icing() -> anyhow::Result<()> {
        init_tracing();
        let catalog = Catalog::fallback();
        let sink = RecordingSink::default();
        let mut calc = Calculator::with_kind(PricingPolicyKind::ScaledBase);
        reference_order(&mut calc, &catalog);

        let outcome = calc.submit(&sink).await;
        assert!(matches!(outcome, SubmitOutcome::Saved(_)));
        assert_eq!(sink.received.borrow().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn payload_total_matches_displayed_total() -> anyhow::Result<()> {
        init_tracing();
        let catalog = Catalog::fallback();
        let sink = RecordingSink::default();
        let mut calc = Calculator::default();
        reference_order(&mut calc, &catalog);
        calc.dispatch(Intent::SelectIcingColor {
            part: IcingPart::Base,
            color: catalog.color(9).cloned(),
        });
        calc.dispatch(Intent::SelectShade {
            part: IcingPart::Base,
            tier: ShadeTier::Light,
        });
        calc.dispatch(Intent::ToggleRush(true));
        calc.dispatch(Intent::SelectBaseCake(Some(4)));

        let displayed = calc.breakdown().total;
        // (460 + 50) * 1.5
        assert_eq!(displayed, dec!(765));

        let outcome = calc.submit(&sink).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Saved(EstimateReceipt {
                estimate_id: Some("est-1".to_owned())
            })
        );

        let sent = sink.received.borrow()[0].clone();
        assert_eq!(sent.total_price, displayed);
        assert_eq!(sent.cake_id, Some(4));
        assert_eq!(sent.size, "5x3");
        assert_eq!(sent.num_layers, 3);
        assert_eq!(sent.flavor_id, 2);
        assert_eq!(sent.toppings.len(), 1);
        assert_eq!(sent.toppings[0].quantity, 2);
        let base = sent.icing.base.expect("base icing sent");
        assert_eq!(base.color_name, "White");
        assert_eq!(base.shade, Some(ShadeTier::Light));
        assert!(sent.icing.sides.is_none());
        assert!(sent.is_rush);
        Ok(())
    }

    #[tokio::test]
    async fn transport_failure_is_reported_not_masked() -> anyhow::Result<()> {
        init_tracing();
        let catalog = Catalog::fallback();
        let sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        let mut calc = Calculator::with_kind(PricingPolicyKind::ScaledBase);
        reference_order(&mut calc, &catalog);

        let Effect::Submit(prepared) = calc.dispatch(Intent::Submit) else {
            panic!("submit intent should yield a submission");
        };
        let outcome = send_estimate(&sink, prepared).await;
        assert!(matches!(outcome, SubmitOutcome::Failed(ref msg) if msg.contains("connection reset")));
        Ok(())
    }
}
