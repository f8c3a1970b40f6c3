use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrainInfo {
    pub train_no: String,
    pub dep_station: String,
    pub arr_station: String,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub total_seats: Option<i32>,
}

/// Service class, taken from the train number prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrainKind {
    Ktx,
    Mugunghwa,
    Other,
}

impl TrainKind {
    pub fn of(train_no: &str) -> Self {
        if train_no.starts_with("KTX") {
            TrainKind::Ktx
        } else if train_no.starts_with("무궁화") {
            TrainKind::Mugunghwa
        } else {
            TrainKind::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrainKind::Ktx => "KTX",
            TrainKind::Mugunghwa => "무궁화",
            TrainKind::Other => "기타",
        }
    }

    /// Stops served by this class of train, in travel order.
    pub fn stops(&self) -> &'static [&'static str] {
        match self {
            TrainKind::Ktx => &["서울", "천안아산", "오송", "서대전", "익산", "광주송정"],
            TrainKind::Mugunghwa => &["용산", "수원", "천안", "신례원", "홍성", "대천"],
            TrainKind::Other => &[],
        }
    }
}

const TRAIN_COLUMNS: &str = "
    train_number      AS train_no,
    departure_station AS dep_station,
    arrival_station   AS arr_station,
    departure_time,
    arrival_time,
    total_seats";

impl TrainInfo {
    pub fn kind(&self) -> TrainKind {
        TrainKind::of(&self.train_no)
    }

    pub async fn all(db: &crate::database::Database) -> Result<Vec<TrainInfo>, sqlx::Error> {
        sqlx::query_as::<_, TrainInfo>(&format!(
            "SELECT {TRAIN_COLUMNS} FROM train_info ORDER BY departure_time, train_number"
        ))
        .fetch_all(&db.pool)
        .await
    }

    pub async fn find(
        train_no: &str,
        db: &crate::database::Database,
    ) -> Result<Option<TrainInfo>, sqlx::Error> {
        sqlx::query_as::<_, TrainInfo>(&format!(
            "SELECT {TRAIN_COLUMNS} FROM train_info WHERE train_number = $1"
        ))
        .bind(train_no)
        .fetch_optional(&db.pool)
        .await
    }
}
