pub mod ai_service;
pub mod appointment_board;
pub mod comment_service;
pub mod confirmation;
pub mod shop_board;
