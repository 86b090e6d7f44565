// src/views/messaging.rs

use reqwest::Url;
use serde::Serialize;

use crate::models::VehicleInShop;

const WHATSAPP_BASE: &str = "https://wa.me/";

/// Mensagem pronta para o cliente copiar ou abrir no WhatsApp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    pub phone: String,
    pub message: String,
    pub link: String,
}

/// Só os dígitos do contato: "(55) 1234-5678" -> "5512345678".
pub fn phone_digits(contact: &str) -> String {
    contact.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn vehicle_message(vehicle: &VehicleInShop) -> String {
    let mut message = format!(
        "Hola {}, su vehículo {} está en el taller.",
        vehicle.customer_name, vehicle.vehicle
    );
    if !vehicle.notes.is_empty() {
        message.push_str(&format!(" Nota: {}", vehicle.notes));
    }
    message
}

pub fn whatsapp_link(contact: &str, message: &str) -> String {
    let phone = phone_digits(contact);
    match Url::parse_with_params(&format!("{}{}", WHATSAPP_BASE, phone), &[("text", message)]) {
        Ok(url) => url.to_string(),
        // Só falha com uma base inválida; o número já é só dígitos
        Err(_) => format!("{}{}", WHATSAPP_BASE, phone),
    }
}

pub fn vehicle_whatsapp(vehicle: &VehicleInShop) -> OutboundMessage {
    let message = vehicle_message(vehicle);
    OutboundMessage {
        phone: phone_digits(&vehicle.contact),
        link: whatsapp_link(&vehicle.contact, &message),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_everything_but_digits() {
        assert_eq!(phone_digits("+52 (55) 1234-5678 ext"), "525512345678");
        assert_eq!(phone_digits("sin teléfono"), "");
    }

    #[test]
    fn link_is_encoded() {
        let link = whatsapp_link("(55) 1234-5678", "Hola Ana, listo & pagado");
        assert!(link.starts_with("https://wa.me/5512345678?text="));
        assert!(!link.contains(' '));
        assert!(link.contains("%26"));
    }
}
