//! Order message rendering.

use crate::checkout::{CartSnapshot, OrderForm};

/// Store name shown in the message header.
pub const STORE_NAME: &str = "Alforja Café";

/// Render the order message for a snapshot and a filled-in form.
///
/// Sections, in order: customer, shipping, payment method, numbered products
/// (with an options line when the line has options, then the line subtotal),
/// grand total, notes when not blank, and a closing line. The grand total is
/// the snapshot's, not a recomputation. Output depends only on the inputs, so
/// the same pair always renders byte-identical text.
#[must_use]
pub fn compose_message(snapshot: &CartSnapshot, form: &OrderForm) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("🛒 *NUEVO PEDIDO - {STORE_NAME}*"));
    lines.push(String::new());

    lines.push("*📋 INFORMACIÓN DEL CLIENTE:*".to_string());
    lines.push(format!("• Nombre: {}", form.customer_name));
    lines.push(format!("• Email: {}", form.customer_email));
    lines.push(format!("• Teléfono: {}", form.customer_phone));
    lines.push(String::new());

    lines.push("*🚚 DIRECCIÓN DE ENVÍO:*".to_string());
    lines.push(format!("• Dirección: {}", form.shipping_address));
    lines.push(format!("• Ciudad: {}", form.shipping_city));
    lines.push(format!("• Código Postal: {}", form.shipping_zip_code));
    lines.push(String::new());

    lines.push("*💳 MÉTODO DE PAGO:*".to_string());
    lines.push(format!("• {}", form.payment_method));
    lines.push(String::new());

    lines.push("*🛍️ PRODUCTOS SOLICITADOS:*".to_string());
    for (index, item) in snapshot.items().iter().enumerate() {
        lines.push(format!("{}. {} x{}", index + 1, item.name, item.quantity));
        if let Some(options) = item.options_label() {
            lines.push(format!("   └ Opciones: {options}"));
        }
        lines.push(format!("   └ Precio: {}", item.subtotal()));
        lines.push(String::new());
    }

    lines.push(format!(
        "*💰 TOTAL DEL PEDIDO: {}*",
        snapshot.total_price()
    ));
    lines.push(String::new());

    if let Some(notes) = form.notes() {
        lines.push("*📝 NOTAS ADICIONALES:*".to_string());
        lines.push(notes.to_string());
        lines.push(String::new());
    }

    lines.push(
        "Por favor, confirma mi pedido y coordina el pago y envío. ¡Gracias! ☕".to_string(),
    );

    lines.join("\n")
}
