use parseq::QueryRecord;

#[derive(QueryRecord)]
pub enum Direction {
    Up,
    Down,
}

fn main() {}
