// Client-facing messages of the reservation endpoints

pub const BOOKING_NOT_FOUND: &str = "La reserva solicitada no existe.";
pub const NO_SALE_ORDER: &str = "La reserva no tiene una orden de venta asociada.";
pub const BILL_RENDER_FAILED: &str = "Error generando recibo";
pub const INVOICE_CREATED: &str = "Factura creada/actualizada correctamente.";
pub const NOT_CLEANING_NEEDED: &str =
    "La habitación solo puede marcarse como lista desde el estado \"cleaning_needed\".";
pub const ROOM_READY_FAILED: &str = "Error al marcar la habitación como lista";
pub const ROOM_MARKED_READY: &str = "La reserva fue marcada como \"Habitación Lista\".";
