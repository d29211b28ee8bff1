pub mod category;
pub mod customer;
pub mod order;
pub mod order_row;
pub mod product;
