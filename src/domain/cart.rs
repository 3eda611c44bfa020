use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::pricing::Size;

/// One line of a visitor's cart. The line is keyed by product id plus the
/// optional size selector; `subtotal` is recomputed on every mutation and
/// never drifts from `quantity * unit_price`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub size: Option<Size>,
    pub quantity: u32,
    #[schema(value_type = String)]
    pub unit_price: Decimal,
    #[schema(value_type = String)]
    pub subtotal: Decimal,
}

/// Session-scoped cart. Lines keep insertion order for display.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Merge-or-insert a line. Re-adding the same product+size increments
    /// the existing quantity; the line keeps the price it was created with.
    /// Returns the new total item count for the UI badge.
    pub fn add(
        &mut self,
        product_id: Uuid,
        name: impl Into<String>,
        size: Option<Size>,
        quantity: u32,
        unit_price: Decimal,
    ) -> u32 {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id && l.size == size)
        {
            line.quantity += quantity;
            line.subtotal = unit_price_times(line.quantity, line.unit_price);
        } else {
            self.lines.push(CartLine {
                product_id,
                name: name.into(),
                size,
                quantity,
                unit_price,
                subtotal: unit_price_times(quantity, unit_price),
            });
        }
        self.item_count()
    }

    /// Set a line's quantity. Zero or negative removes the line. An absent
    /// key is a silent no-op so retried requests stay idempotent.
    pub fn update_quantity(&mut self, product_id: Uuid, size: Option<Size>, quantity: i32) {
        if quantity <= 0 {
            self.remove(product_id, size);
            return;
        }
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id && l.size == size)
        {
            line.quantity = quantity as u32;
            line.subtotal = unit_price_times(line.quantity, line.unit_price);
        }
    }

    pub fn remove(&mut self, product_id: Uuid, size: Option<Size>) {
        self.lines
            .retain(|l| !(l.product_id == product_id && l.size == size));
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of line subtotals. Equal by construction to recomputing
    /// quantity * unit_price for every line.
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(|l| l.subtotal).sum()
    }

    /// Sum of quantities across lines (not the number of lines).
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

fn unit_price_times(quantity: u32, unit_price: Decimal) -> Decimal {
    unit_price * Decimal::from(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[test]
    fn adding_same_product_and_size_merges_into_one_line() {
        let mut cart = Cart::default();
        let id = Uuid::new_v4();
        cart.add(id, "Hawaiana", Some(Size::Mediana), 1, price(120));
        let count = cart.add(id, "Hawaiana", Some(Size::Mediana), 2, price(120));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.lines()[0].subtotal, price(360));
        assert_eq!(count, 3);
    }

    #[test]
    fn same_product_different_sizes_are_separate_lines() {
        let mut cart = Cart::default();
        let id = Uuid::new_v4();
        cart.add(id, "Hawaiana", Some(Size::Chica), 1, price(90));
        cart.add(id, "Hawaiana", Some(Size::Grande), 1, price(150));

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn total_matches_recomputed_quantity_times_price() {
        let mut cart = Cart::default();
        let pizza = Uuid::new_v4();
        let soda = Uuid::new_v4();
        cart.add(pizza, "Hawaiana", Some(Size::Mediana), 1, price(120));
        cart.add(soda, "Refresco", None, 2, price(20));
        cart.update_quantity(soda, None, 3);
        cart.remove(pizza, Some(Size::Mediana));
        cart.add(pizza, "Hawaiana", Some(Size::Chica), 2, price(90));

        let recomputed: Decimal = cart
            .lines()
            .iter()
            .map(|l| l.unit_price * Decimal::from(l.quantity))
            .sum();
        assert_eq!(cart.total(), recomputed);
        assert_eq!(cart.total(), price(240));
    }

    #[test]
    fn update_to_zero_removes_the_line() {
        let mut cart = Cart::default();
        let id = Uuid::new_v4();
        cart.add(id, "Refresco", None, 2, price(20));
        assert_eq!(cart.item_count(), 2);

        cart.update_quantity(id, None, 0);
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn update_of_missing_line_is_a_no_op() {
        let mut cart = Cart::default();
        let id = Uuid::new_v4();
        cart.add(id, "Refresco", None, 1, price(20));

        cart.update_quantity(Uuid::new_v4(), None, 5);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn remove_of_missing_line_is_a_no_op() {
        let mut cart = Cart::default();
        let id = Uuid::new_v4();
        cart.add(id, "Refresco", None, 1, price(20));
        cart.remove(id, Some(Size::Chica));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = Cart::default();
        cart.add(Uuid::new_v4(), "Refresco", None, 2, price(20));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }
}
