//! Text-menu front end. Thin glue: every branch parses operator input,
//! delegates to a service and prints the result. Service errors are printed
//! and the loop continues; nothing here is fatal to the process.

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    db::DbPool,
    entities::order::OrderStatus,
    errors::ServiceError,
    services::{
        categories::{CategoryService, CreateCategoryRequest, UpdateCategoryRequest},
        customers::{CreateCustomerRequest, CustomerService, UpdateCustomerRequest},
        orders::{CreateOrderRequest, OrderItemInput, OrderService},
        products::{CreateProductRequest, ProductService, UpdateProductRequest},
    },
};

/// Runs the interactive menu loop until the operator types `exit` (or stdin
/// closes).
pub async fn run(db: Arc<DbPool>) -> Result<(), ServiceError> {
    let console = Console::new(db);
    console.main_menu().await
}

struct Console {
    customers: CustomerService,
    categories: CategoryService,
    products: ProductService,
    orders: OrderService,
}

impl Console {
    fn new(db: Arc<DbPool>) -> Self {
        Self {
            customers: CustomerService::new(db.clone()),
            categories: CategoryService::new(db.clone()),
            products: ProductService::new(db.clone()),
            orders: OrderService::new(db),
        }
    }

    async fn main_menu(&self) -> Result<(), ServiceError> {
        loop {
            println!("\nMain Menu:\n| 1. customers |\n| 2. products |\n| 3. categories |\n| 4. orders |\n| 5. filter orders |\n| exit");
            let Some(line) = prompt("> ") else { break };
            match line.to_lowercase().as_str() {
                "" => continue,
                "exit" => break,
                "1" => self.customer_menu().await,
                "2" => self.product_menu().await,
                "3" => self.category_menu().await,
                "4" => self.order_menu().await,
                "5" => self.filter_menu().await,
                _ => println!("unknown command"),
            }
        }
        Ok(())
    }

    async fn customer_menu(&self) {
        loop {
            println!("\nCustomer Menu:\n| 1. list customers |\n| 2. add customer |\n| 3. edit customer <id> |\n| 4. delete customer <id> |\n| 5. number of orders |\n| exit");
            let Some(line) = prompt("> ") else { break };
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("exit") {
                break;
            }
            let (cmd, arg) = split_command(&line);
            let result = match cmd {
                "1" => self.list_customers().await,
                "2" => self.add_customer().await,
                "3" => match arg {
                    Some(id) => self.edit_customer(id).await,
                    None => usage("3 (edit) <id>"),
                },
                "4" => match arg {
                    Some(id) => self.customers.delete(id).await.map(|()| {
                        println!("Customer deleted!");
                    }),
                    None => usage("4 (delete) <id>"),
                },
                "5" => self.number_of_orders().await,
                _ => {
                    println!("unknown command");
                    Ok(())
                }
            };
            report(result);
        }
    }

    async fn list_customers(&self) -> Result<(), ServiceError> {
        let (page, page_size) = prompt_pagination()?;
        let customers = self.customers.list(page, page_size).await?;
        println!(
            "Page = {}/{}, pageSize = {}",
            customers.page,
            customers.total_pages(),
            customers.page_size
        );
        println!("Customer Id | Customer Name | Email | City | Orders");
        for c in &customers.items {
            println!(
                "{} | {} | {} | {} | {}",
                c.id,
                c.name,
                c.email,
                c.city.as_deref().unwrap_or(""),
                c.order_count
            );
        }
        Ok(())
    }

    async fn add_customer(&self) -> Result<(), ServiceError> {
        let name = prompt_required("Customer Name: ")?;
        let email = prompt_required("Email: ")?;
        let city = prompt("City: ").filter(|s| !s.is_empty());
        let personnummer = prompt_required("Personnummer (YYYYMMDDXXXX): ")?;

        self.customers
            .create(CreateCustomerRequest {
                name,
                email,
                city,
                personnummer,
            })
            .await?;
        println!("Customer added!");
        Ok(())
    }

    async fn edit_customer(&self, id: i32) -> Result<(), ServiceError> {
        let current = self.customers.get(id).await?;
        let name = prompt(&format!("Edit name ({}): ", current.name)).filter(|s| !s.is_empty());
        let email = prompt(&format!("Edit email ({}): ", current.email)).filter(|s| !s.is_empty());
        let city = prompt(&format!(
            "Edit city ({}): ",
            current.city.as_deref().unwrap_or("")
        ))
        .filter(|s| !s.is_empty());

        self.customers
            .update(id, UpdateCustomerRequest { name, email, city })
            .await?;
        println!("Customer edited!");
        Ok(())
    }

    async fn number_of_orders(&self) -> Result<(), ServiceError> {
        let counts = self.customers.order_counts().await?;
        println!("Customer Id | Name | Email | Number of Orders");
        for row in counts {
            println!(
                "{} | {} | {} | {}",
                row.customer_id, row.name, row.email, row.number_of_orders
            );
        }
        Ok(())
    }

    async fn product_menu(&self) {
        loop {
            println!("\nProduct Menu:\n| 1. list products |\n| 2. list products by category <id> |\n| 3. add product |\n| 4. edit product <id> |\n| 5. delete product <id> |\n| 6. quantity sold |\n| exit");
            let Some(line) = prompt("> ") else { break };
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("exit") {
                break;
            }
            let (cmd, arg) = split_command(&line);
            let result = match cmd {
                "1" => self.list_products().await,
                "2" => match arg {
                    Some(id) => self.list_products_by_category(id).await,
                    None => usage("2 (by category) <id>"),
                },
                "3" => self.add_product().await,
                "4" => match arg {
                    Some(id) => self.edit_product(id).await,
                    None => usage("4 (edit) <id>"),
                },
                "5" => match arg {
                    Some(id) => self.products.delete(id).await.map(|()| {
                        println!("Product deleted!");
                    }),
                    None => usage("5 (delete) <id>"),
                },
                "6" => self.quantity_sold().await,
                _ => {
                    println!("unknown command");
                    Ok(())
                }
            };
            report(result);
        }
    }

    async fn list_products(&self) -> Result<(), ServiceError> {
        let (page, page_size) = prompt_pagination()?;
        let products = self.products.list(page, page_size).await?;
        println!(
            "Page = {}/{}, pageSize = {}",
            products.page,
            products.total_pages(),
            products.page_size
        );
        println!("Product Id | Name | Price | Description");
        for p in &products.items {
            println!(
                "{} | {} | {} | {}",
                p.id,
                p.name,
                p.price,
                p.description.as_deref().unwrap_or("")
            );
        }
        Ok(())
    }

    async fn list_products_by_category(&self, category_id: i32) -> Result<(), ServiceError> {
        let products = self.products.list_by_category(category_id).await?;
        println!("Product Id | Name | Price | Description");
        for p in products {
            println!(
                "{} | {} | {} | {}",
                p.id,
                p.name,
                p.price,
                p.description.as_deref().unwrap_or("")
            );
        }
        Ok(())
    }

    async fn add_product(&self) -> Result<(), ServiceError> {
        let name = prompt_required("Product Name: ")?;
        let description = prompt("Description: ").filter(|s| !s.is_empty());
        let price: Decimal = prompt_parse("Price: ")?;
        let category_id = match prompt("Category Id (empty for none): ") {
            Some(s) if !s.is_empty() => Some(parse_input::<i32>(&s)?),
            _ => None,
        };

        self.products
            .create(CreateProductRequest {
                name,
                description,
                price,
                category_id,
            })
            .await?;
        println!("Product added!");
        Ok(())
    }

    async fn edit_product(&self, id: i32) -> Result<(), ServiceError> {
        let current = self.products.get(id).await?;
        let name = prompt(&format!("Edit name ({}): ", current.name)).filter(|s| !s.is_empty());
        let description = prompt(&format!(
            "Edit description ({}): ",
            current.description.as_deref().unwrap_or("")
        ))
        .filter(|s| !s.is_empty());
        let price = match prompt(&format!("Edit price ({}): ", current.price)) {
            Some(s) if !s.is_empty() => Some(parse_input::<Decimal>(&s)?),
            _ => None,
        };

        self.products
            .update(
                id,
                UpdateProductRequest {
                    name,
                    description,
                    price,
                    category_id: None,
                },
            )
            .await?;
        println!("Product edited!");
        Ok(())
    }

    async fn quantity_sold(&self) -> Result<(), ServiceError> {
        let sales = self.products.sales().await?;
        println!("Product Id | Product Name | Total Quantity Sold");
        for row in sales {
            println!(
                "{} | {} | {}",
                row.product_id, row.product_name, row.total_quantity_sold
            );
        }
        Ok(())
    }

    async fn category_menu(&self) {
        loop {
            println!("\nCategory Menu:\n| 1. list categories |\n| 2. add category |\n| 3. edit category <id> |\n| 4. delete category <id> |\n| exit");
            let Some(line) = prompt("> ") else { break };
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("exit") {
                break;
            }
            let (cmd, arg) = split_command(&line);
            let result = match cmd {
                "1" => self.list_categories().await,
                "2" => self.add_category().await,
                "3" => match arg {
                    Some(id) => self.edit_category(id).await,
                    None => usage("3 (edit) <id>"),
                },
                "4" => match arg {
                    Some(id) => self.categories.delete(id).await.map(|()| {
                        println!("Category deleted!");
                    }),
                    None => usage("4 (delete) <id>"),
                },
                _ => {
                    println!("unknown command");
                    Ok(())
                }
            };
            report(result);
        }
    }

    async fn list_categories(&self) -> Result<(), ServiceError> {
        let (page, page_size) = prompt_pagination()?;
        let categories = self.categories.list(page, page_size).await?;
        println!(
            "Page = {}/{}, pageSize = {}",
            categories.page,
            categories.total_pages(),
            categories.page_size
        );
        println!("Category Id | Name | Description");
        for c in &categories.items {
            println!(
                "{} | {} | {}",
                c.id,
                c.name,
                c.description.as_deref().unwrap_or("")
            );
        }
        Ok(())
    }

    async fn add_category(&self) -> Result<(), ServiceError> {
        let name = prompt_required("Category Name: ")?;
        let description = prompt("Description: ").filter(|s| !s.is_empty());
        self.categories
            .create(CreateCategoryRequest { name, description })
            .await?;
        println!("Category added!");
        Ok(())
    }

    async fn edit_category(&self, id: i32) -> Result<(), ServiceError> {
        let current = self.categories.get(id).await?;
        let name = prompt(&format!("Edit name ({}): ", current.name)).filter(|s| !s.is_empty());
        let description = prompt(&format!(
            "Edit description ({}): ",
            current.description.as_deref().unwrap_or("")
        ))
        .filter(|s| !s.is_empty());

        self.categories
            .update(id, UpdateCategoryRequest { name, description })
            .await?;
        println!("Category edited!");
        Ok(())
    }

    async fn order_menu(&self) {
        loop {
            println!("\nOrder Menu:\n| 1. list orders |\n| 2. order details <id> |\n| 3. add order |\n| 4. delete order <id> |\n| 5. set status <id> |\n| 6. add row <order id> |\n| 7. edit row <row id> |\n| 8. delete row <row id> |\n| 9. order summaries |\n| exit");
            let Some(line) = prompt("> ") else { break };
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("exit") {
                break;
            }
            let (cmd, arg) = split_command(&line);
            let result = match cmd {
                "1" => self.list_orders().await,
                "2" => match arg {
                    Some(id) => self.order_details(id).await,
                    None => usage("2 (details) <id>"),
                },
                "3" => self.add_order().await,
                "4" => match arg {
                    Some(id) => self.orders.delete(id).await.map(|()| {
                        println!("Order deleted!");
                    }),
                    None => usage("4 (delete) <id>"),
                },
                "5" => match arg {
                    Some(id) => self.set_order_status(id).await,
                    None => usage("5 (set status) <id>"),
                },
                "6" => match arg {
                    Some(id) => self.add_order_row(id).await,
                    None => usage("6 (add row) <order id>"),
                },
                "7" => match arg {
                    Some(id) => self.edit_order_row(id).await,
                    None => usage("7 (edit row) <row id>"),
                },
                "8" => match arg {
                    Some(id) => self.orders.delete_row(id).await.map(|details| {
                        println!("Row deleted. New total: {}", details.total_amount);
                    }),
                    None => usage("8 (delete row) <row id>"),
                },
                "9" => self.order_summaries().await,
                _ => {
                    println!("unknown command");
                    Ok(())
                }
            };
            report(result);
        }
    }

    async fn list_orders(&self) -> Result<(), ServiceError> {
        let (page, page_size) = prompt_pagination()?;
        let orders = self.orders.list(page, page_size).await?;
        println!(
            "Page = {}/{}, pageSize = {}",
            orders.page,
            orders.total_pages(),
            orders.page_size
        );
        println!("Order Id | Order Date | Status | Customer Name | Total Amount");
        for o in &orders.items {
            println!(
                "{} | {} | {} | {} | {}",
                o.id, o.order_date, o.status, o.customer_name, o.total_amount
            );
        }
        Ok(())
    }

    async fn order_details(&self, order_id: i32) -> Result<(), ServiceError> {
        let details = self.orders.get_details(order_id).await?;
        println!("Row Id | Product Name | Quantity | Price per unit | Row Amount");
        for row in &details.rows {
            println!(
                "{} | {} | {} | {} | {}",
                row.row_id, row.product_name, row.quantity, row.unit_price, row.row_amount
            );
        }
        println!("Total Amount: {}", details.total_amount);
        Ok(())
    }

    async fn add_order(&self) -> Result<(), ServiceError> {
        let customers = self.customers.list(1, 100).await?;
        println!("Customer Id | Customer Name | Email | City");
        for c in &customers.items {
            println!(
                "{} | {} | {} | {}",
                c.id,
                c.name,
                c.email,
                c.city.as_deref().unwrap_or("")
            );
        }
        let customer_id: i32 = prompt_parse("Enter Customer Id for this order: ")?;

        let mut items = Vec::new();
        loop {
            println!("Available products:");
            let products = self.products.list(1, 100).await?;
            println!("Product Id | Name | Price | Description");
            for p in &products.items {
                println!(
                    "{} | {} | {} | {}",
                    p.id,
                    p.name,
                    p.price,
                    p.description.as_deref().unwrap_or("")
                );
            }

            let product_id: i32 = prompt_parse("Enter Product Id: ")?;
            let quantity: i32 = prompt_parse("Enter Quantity: ")?;
            items.push(OrderItemInput {
                product_id,
                quantity,
            });

            let Some(answer) = prompt("\nDone with order?\n> 'yes' or 'no': ") else {
                break;
            };
            if answer.eq_ignore_ascii_case("yes") {
                break;
            }
        }

        let details = self
            .orders
            .create(CreateOrderRequest { customer_id, items })
            .await?;
        println!(
            "Order created. Id: {}, total: {}",
            details.id, details.total_amount
        );
        Ok(())
    }

    async fn set_order_status(&self, order_id: i32) -> Result<(), ServiceError> {
        let status = prompt_status()?;
        self.orders.update_status(order_id, status).await?;
        println!("Order status updated!");
        Ok(())
    }

    async fn add_order_row(&self, order_id: i32) -> Result<(), ServiceError> {
        let product_id: i32 = prompt_parse("Enter Product Id: ")?;
        let quantity: i32 = prompt_parse("Enter Quantity: ")?;
        let details = self
            .orders
            .add_row(
                order_id,
                OrderItemInput {
                    product_id,
                    quantity,
                },
            )
            .await?;
        println!("Row added. New total: {}", details.total_amount);
        Ok(())
    }

    async fn edit_order_row(&self, row_id: i32) -> Result<(), ServiceError> {
        let quantity: i32 = prompt_parse("New Quantity: ")?;
        let details = self.orders.update_row_quantity(row_id, quantity).await?;
        println!("Row updated. New total: {}", details.total_amount);
        Ok(())
    }

    async fn order_summaries(&self) -> Result<(), ServiceError> {
        let summaries = self.orders.summaries().await?;
        println!("Order Id | Order Date | Total Amount | Customer Name | Customer Email");
        for s in summaries {
            println!(
                "{} | {} | {} | {} | {}",
                s.order_id, s.order_date, s.total_amount, s.customer_name, s.customer_email
            );
        }
        Ok(())
    }

    async fn filter_menu(&self) {
        loop {
            println!("\nFilter Orders:\n| 1. by customer <id> |\n| 2. by status |\n| exit");
            let Some(line) = prompt("> ") else { break };
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("exit") {
                break;
            }
            let (cmd, arg) = split_command(&line);
            let result = match cmd {
                "1" => match arg {
                    Some(id) => self.orders_by_customer(id).await,
                    None => usage("1 (by customer) <id>"),
                },
                "2" => self.orders_by_status().await,
                _ => {
                    println!("unknown command");
                    Ok(())
                }
            };
            report(result);
        }
    }

    async fn orders_by_customer(&self, customer_id: i32) -> Result<(), ServiceError> {
        let orders = self.orders.list_by_customer(customer_id).await?;
        println!("Order Id | Order Date | Status | Customer Name | Total Amount");
        for o in orders {
            println!(
                "{} | {} | {} | {} | {}",
                o.id, o.order_date, o.status, o.customer_name, o.total_amount
            );
        }
        Ok(())
    }

    async fn orders_by_status(&self) -> Result<(), ServiceError> {
        let status = prompt_status()?;
        let orders = self.orders.list_by_status(status).await?;
        println!("Order Id | Order Date | Status | Customer Name | Total Amount");
        for o in orders {
            println!(
                "{} | {} | {} | {} | {}",
                o.id, o.order_date, o.status, o.customer_name, o.total_amount
            );
        }
        Ok(())
    }
}

/// Prints a prompt and reads one trimmed line. `None` on closed stdin.
fn prompt(label: &str) -> Option<String> {
    print!("{label}");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().lock().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn prompt_required(label: &str) -> Result<String, ServiceError> {
    match prompt(label) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(ServiceError::InvalidInput("a value is required".to_string())),
    }
}

/// Prompts and parses, rejecting bad input before any database call.
fn prompt_parse<T: FromStr>(label: &str) -> Result<T, ServiceError> {
    let raw = prompt_required(label)?;
    parse_input(&raw)
}

fn parse_input<T: FromStr>(raw: &str) -> Result<T, ServiceError> {
    raw.parse()
        .map_err(|_| ServiceError::InvalidInput(format!("'{raw}' is not a valid value")))
}

fn prompt_pagination() -> Result<(u64, u64), ServiceError> {
    let page: u64 = prompt_parse("Please enter page: ")?;
    let page_size: u64 = prompt_parse("Please enter page size: ")?;
    Ok((page, page_size))
}

fn prompt_status() -> Result<OrderStatus, ServiceError> {
    prompt_parse("Status (processing / completed / canceled): ")
}

/// Splits "3 17" into the command and an optional integer argument.
fn split_command(line: &str) -> (&str, Option<i32>) {
    let mut parts = line.split_whitespace();
    let cmd = parts.next().unwrap_or("");
    let arg = parts.next().and_then(|s| s.parse().ok());
    (cmd, arg)
}

fn usage(text: &str) -> Result<(), ServiceError> {
    println!("Usage: {text}");
    Ok(())
}

fn report(result: Result<(), ServiceError>) {
    if let Err(err) = result {
        println!("{err}");
    }
}
