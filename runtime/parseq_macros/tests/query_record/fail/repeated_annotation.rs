use parseq::QueryRecord;

#[derive(QueryRecord)]
pub struct Record {
    #[query = "a"]
    #[query = "b"]
    pub field: String,
}

fn main() {}
