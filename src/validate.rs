//! Payload validation. Every function here is pure and runs before any
//! persistence, so a rejected request never leaves partial writes behind.

use rust_decimal::Decimal;
use url::Url;

use crate::{
    dto::{
        categories::CategoryPayload,
        orders::PlaceOrderRequest,
        products::ProductPayload,
    },
    error::AppError,
};

pub fn validate_registration(name: &str, phone: &str, password: &str) -> Result<(), AppError> {
    if name.trim().chars().count() < 2 {
        return Err(AppError::Validation("O nome é inválido.".into()));
    }
    if !is_valid_phone(phone) {
        return Err(AppError::Validation(
            "O telefone deve conter apenas números (DDD + número).".into(),
        ));
    }
    if password.chars().count() < 6 {
        return Err(AppError::Validation(
            "A senha deve ter no mínimo 6 caracteres.".into(),
        ));
    }
    Ok(())
}

pub fn validate_login(phone: &str, password: &str) -> Result<(), AppError> {
    if phone.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Telefone e senha são obrigatórios.".into(),
        ));
    }
    Ok(())
}

pub fn validate_order(payload: &PlaceOrderRequest) -> Result<(), AppError> {
    if payload.address.trim().chars().count() < 10 {
        return Err(AppError::Validation(
            "O endereço de entrega parece curto ou inválido. Por favor, verifique.".into(),
        ));
    }
    if payload.total <= Decimal::ZERO {
        return Err(AppError::Validation(
            "O valor total do pedido é inválido.".into(),
        ));
    }
    if payload.items.is_empty() {
        return Err(AppError::Validation(
            "O carrinho não pode estar vazio.".into(),
        ));
    }

    for item in &payload.items {
        if item.name.trim().is_empty() || item.price <= Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "O item \"{}\" no carrinho está com dados em falta.",
                item.name
            )));
        }
        if item.quantity <= 0 {
            return Err(AppError::Validation(format!(
                "A quantidade para o item \"{}\" é inválida.",
                item.name
            )));
        }
    }

    // The client-computed total is not trusted: it must match the item
    // subtotals exactly or the order is rejected before the transaction opens.
    let computed: Decimal = payload
        .items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum();
    if computed != payload.total {
        return Err(AppError::Validation(
            "O valor total não corresponde aos itens do pedido.".into(),
        ));
    }

    Ok(())
}

pub fn validate_product(payload: &ProductPayload) -> Result<(), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation(
            "O nome do produto é obrigatório.".into(),
        ));
    }
    if payload.description.trim().is_empty() {
        return Err(AppError::Validation(
            "A descrição do produto é obrigatória.".into(),
        ));
    }
    if payload.price <= Decimal::ZERO {
        return Err(AppError::Validation(
            "O preço do produto é inválido.".into(),
        ));
    }
    if let Some(old_price) = payload.old_price {
        if old_price <= Decimal::ZERO {
            return Err(AppError::Validation(
                "O preço antigo do produto é inválido.".into(),
            ));
        }
    }
    if !is_absolute_http_url(&payload.image) {
        return Err(AppError::Validation(
            "A imagem do produto deve ser uma URL válida.".into(),
        ));
    }
    Ok(())
}

pub fn validate_category(payload: &CategoryPayload) -> Result<(), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation(
            "O nome da categoria é obrigatório.".into(),
        ));
    }
    Ok(())
}

fn is_valid_phone(phone: &str) -> bool {
    let len = phone.chars().count();
    (10..=11).contains(&len) && phone.chars().all(|c| c.is_ascii_digit())
}

fn is_absolute_http_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::orders::OrderItemInput;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn valid_order() -> PlaceOrderRequest {
        PlaceOrderRequest {
            items: vec![OrderItemInput {
                id: Uuid::new_v4(),
                name: "Burger".into(),
                price: dec("10.0"),
                quantity: 2,
            }],
            total: dec("20.0"),
            address: "Rua Teste 123, Bairro X".into(),
        }
    }

    #[test]
    fn registration_accepts_valid_input() {
        assert!(validate_registration("Maria", "24999990000", "segredo1").is_ok());
    }

    #[test]
    fn registration_rejects_short_name() {
        let err = validate_registration(" a ", "24999990000", "segredo1").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn registration_rejects_bad_phone() {
        for phone in ["123", "abcdefghij", "2499999000011", "2499 990000"] {
            assert!(validate_registration("Maria", phone, "segredo1").is_err());
        }
    }

    #[test]
    fn registration_rejects_short_password() {
        assert!(validate_registration("Maria", "24999990000", "12345").is_err());
    }

    #[test]
    fn order_accepts_valid_payload() {
        assert!(validate_order(&valid_order()).is_ok());
    }

    #[test]
    fn order_rejects_short_address() {
        let mut order = valid_order();
        order.address = "abc".into();
        assert!(matches!(
            validate_order(&order),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn order_rejects_empty_cart() {
        let mut order = valid_order();
        order.items.clear();
        assert!(validate_order(&order).is_err());
    }

    #[test]
    fn order_rejects_non_positive_quantity() {
        let mut order = valid_order();
        order.items[0].quantity = 0;
        assert!(validate_order(&order).is_err());
    }

    #[test]
    fn order_rejects_total_mismatch() {
        let mut order = valid_order();
        order.total = dec("19.0");
        assert!(validate_order(&order).is_err());
    }

    #[test]
    fn product_rejects_relative_image_url() {
        let payload = ProductPayload {
            name: "X-Burguer".into(),
            description: "Clássico da casa".into(),
            price: dec("18.5"),
            old_price: None,
            image: "/img/burger.png".into(),
            category_id: None,
            promo: false,
        };
        assert!(validate_product(&payload).is_err());
    }

    #[test]
    fn category_requires_name() {
        let payload = CategoryPayload {
            name: "   ".into(),
            display_order: None,
        };
        assert!(validate_category(&payload).is_err());
    }
}
