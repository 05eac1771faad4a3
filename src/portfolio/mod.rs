pub mod filter;
pub mod generate;
pub mod storage;
pub mod types;

pub use filter::{filter_projects, PortfolioFilter};
pub use generate::generate_portfolio;
pub use storage::{get_portfolio_path, load_portfolio, save_portfolio};
pub use types::{Portfolio, Project, ProjectField, Stage};
