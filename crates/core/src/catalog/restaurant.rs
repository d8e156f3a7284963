use super::{CategoricalField, Domain, DomainSchema, Placeholder, MONTH_VALUES};

pub const TARGET: &str = "gasto_total_previsto";

pub const PERIODS: &[&str] = &["Almoco", "Jantar", "Lanche"];
pub const WEEKDAYS: &[&str] =
    &["Domingo", "Quarta", "Quinta", "Sabado", "Segunda", "Sexta", "Terca"];
pub const CUSTOMER_TYPES: &[&str] = &["Habitual", "Novo", "VIP"];
pub const BOOKING_CHANNELS: &[&str] = &["App", "Presencial", "Telefone", "Website"];

const DIRECT_COLUMNS: &[&str] = &[
    "num_pessoas",
    "mesa_especial",
    "criancas",
    "ocasiao_especial",
    "feriado",
    "evento_local",
    "vinho",
    "sobremesa",
    "menu_degustacao",
    "mes_num",
];

pub const EXCLUDED: &[&str] = &["preco_medio_pessoa", "rating_geral"];

pub(super) fn schema() -> DomainSchema {
    DomainSchema {
        domain: Domain::Restaurant,
        target: TARGET,
        direct_columns: DIRECT_COLUMNS,
        placeholders: vec![
            Placeholder { column: "rating_comida", value: 4.3 },
            Placeholder { column: "rating_servico", value: 4.1 },
            Placeholder { column: "rating_ambiente", value: 4.2 },
            Placeholder { column: "tempo_espera_min", value: 10.0 },
            Placeholder { column: "fez_reclamacao", value: 0.0 },
        ],
        categoricals: vec![
            CategoricalField { name: "periodo", values: PERIODS },
            CategoricalField { name: "dia_semana", values: WEEKDAYS },
            CategoricalField { name: "tipo_cliente", values: CUSTOMER_TYPES },
            CategoricalField { name: "canal_reserva", values: BOOKING_CHANNELS },
            CategoricalField { name: "mes", values: MONTH_VALUES },
        ],
        excluded: EXCLUDED,
        derives_season: false,
    }
}
