use super::{CategoricalField, Domain, DomainSchema, Placeholder, MONTH_VALUES, SEASON_VALUES};

pub const TARGET: &str = "gasto_extras_total";

pub const ROOM_TYPES: &[&str] = &["Familiar", "Standard", "Suite", "Superior"];
pub const TRIP_PURPOSES: &[&str] = &["Business", "Evento", "Lazer"];
pub const BOOKING_CHANNELS: &[&str] = &["Agencia", "Booking", "Direto", "Expedia"];
pub const BOARDS: &[&str] = &["Meia_Pensao", "Pequeno_Almoco"];

const DIRECT_COLUMNS: &[&str] = &[
    "noites",
    "antecedencia_dias",
    "num_hospedes",
    "fim_semana",
    "feriado",
    "evento_cidade",
    "foi_spa",
    "num_massagens",
    "pediu_room_service",
    "num_vezes_room_service",
    "late_checkout",
    "estacionamento",
    "transfer_aeroporto",
    "reserva_antecipada",
    "reserva_ultimo_minuto",
];

// Itemised spend that sums into the target, plus list-price columns the scorer owns.
pub const EXCLUDED: &[&str] = &[
    "gasto_quarto_total",
    "preco_quarto_noite",
    "consumo_minibar",
    "consumo_bar_hotel",
    "gasto_spa",
];

pub(super) fn schema() -> DomainSchema {
    DomainSchema {
        domain: Domain::Hotel,
        target: TARGET,
        direct_columns: DIRECT_COLUMNS,
        placeholders: vec![
            Placeholder { column: "rating_limpeza", value: 4.2 },
            Placeholder { column: "rating_staff", value: 4.1 },
            Placeholder { column: "rating_localizacao", value: 4.3 },
            Placeholder { column: "rating_geral", value: 4.2 },
            Placeholder { column: "fez_reclamacao", value: 0.0 },
            Placeholder { column: "desconto_aplicado", value: 0.0 },
            Placeholder { column: "cliente_frequente", value: 0.0 },
        ],
        categoricals: vec![
            CategoricalField { name: "tipo_quarto", values: ROOM_TYPES },
            CategoricalField { name: "motivo_viagem", values: TRIP_PURPOSES },
            CategoricalField { name: "canal_reserva", values: BOOKING_CHANNELS },
            CategoricalField { name: "regime", values: BOARDS },
            CategoricalField { name: "mes", values: MONTH_VALUES },
            CategoricalField { name: "epoca", values: SEASON_VALUES },
        ],
        excluded: EXCLUDED,
        derives_season: true,
    }
}
