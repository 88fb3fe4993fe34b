//! Pure projections from registrations to what the UI draws
//!
//! Nothing here touches the terminal; the `ui` module consumes these models.

pub mod model;

pub use model::{
    Badge, BadgeTone, CardView, GALLERY_LIMIT, INVALID_DATE, RowView, badge_for, format_date,
    gallery_cards, gallery_columns, parse_date, table_rows,
};
