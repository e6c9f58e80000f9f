use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        orders::{CreateOrderItemRequest, CreateOrderRequest, OrderList, UpdateOrderRequest},
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
        users::{CreateUserRequest, UpdateUserRequest, UserList},
    },
    models::{Order, OrderItem, Product, User},
    response::{ApiResponse, Meta},
    routes::{health, orders, products, users},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        orders::list_orders,
        orders::get_order,
        orders::create_order,
        orders::update_order,
        orders::delete_order
    ),
    components(
        schemas(
            User,
            Product,
            Order,
            OrderItem,
            CreateOrderRequest,
            CreateOrderItemRequest,
            UpdateOrderRequest,
            OrderList,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            CreateUserRequest,
            UpdateUserRequest,
            UserList,
            health::HealthData,
            Meta,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<User>,
            ApiResponse<UserList>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalogue endpoints"),
        (name = "Users", description = "User endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
