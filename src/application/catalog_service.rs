use crate::domain::catalog::{ProductPage, ProductQuery, User};
use crate::domain::errors::DomainError;
use crate::domain::ports::StorefrontQueries;

pub struct CatalogService<R> {
    repo: R,
}

impl<R: StorefrontQueries> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_user(&self, id: i32) -> Result<User, DomainError> {
        self.repo.find_user(id)?.ok_or(DomainError::UserNotFound(id))
    }

    pub fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, DomainError> {
        self.repo.list_products(query)
    }
}
