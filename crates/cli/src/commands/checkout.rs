//! Checkout command. Payment is not collected; placing an order empties the
//! cart and prints a confirmation.

use std::fmt::Write as _;

use bookhub_storefront::Result;
use bookhub_storefront::checkout::{Order, OrderSummary, ShippingMethod};
use bookhub_storefront::rentals::SystemClock;

use super::Context;

/// Show the order summary and, unless `dry_run`, place the order.
///
/// # Errors
///
/// Returns an error if nobody is signed in or the cart is empty.
#[allow(clippy::print_stdout)]
pub fn checkout(ctx: &mut Context, shipping: ShippingMethod, dry_run: bool) -> Result<()> {
    let summary = OrderSummary::for_cart(ctx.state.cart(), shipping);
    print!("{}", render_summary(&summary, shipping));

    if dry_run {
        return Ok(());
    }

    let order = ctx.state.place_order(shipping, &SystemClock)?;
    print!("{}", render_confirmation(&order));
    Ok(())
}

fn render_summary(summary: &OrderSummary, shipping: ShippingMethod) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Subtotal:  {}", summary.subtotal);
    let shipping_cost = if summary.shipping.is_zero() {
        "Free".to_owned()
    } else {
        summary.shipping.to_string()
    };
    let _ = writeln!(
        text,
        "Shipping:  {shipping_cost} ({shipping}, {})",
        shipping.delivery_estimate()
    );
    let _ = writeln!(text, "GST (18%): {}", summary.tax);
    let _ = writeln!(text, "Total:     {}", summary.total);
    text
}

fn render_confirmation(order: &Order) -> String {
    format!(
        "Order #{} placed for {} item(s), {} total\n",
        order.number,
        order.items.iter().map(|e| e.quantity).sum::<u32>(),
        order.summary.total
    )
}

#[cfg(test)]
mod tests {
    use bookhub_core::Price;

    use super::*;

    #[test]
    fn test_summary_standard_shipping_is_free() {
        let summary = OrderSummary::new(Price::from_rupees(100), ShippingMethod::Standard);
        let text = render_summary(&summary, ShippingMethod::Standard);
        assert!(text.contains("Shipping:  Free (standard"));
        assert!(text.contains("GST (18%): ₹18.00"));
        assert!(text.contains("Total:     ₹118.00"));
    }

    #[test]
    fn test_summary_express_shipping() {
        let summary = OrderSummary::new(Price::from_rupees(100), ShippingMethod::Express);
        let text = render_summary(&summary, ShippingMethod::Express);
        assert!(text.contains("Shipping:  ₹99.00 (express"));
        assert!(text.contains("Total:     ₹217.00"));
    }
}
