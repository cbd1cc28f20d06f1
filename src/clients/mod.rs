pub mod flux;
pub mod tavily;
