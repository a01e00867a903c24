//! Fixtures shared by unit tests.

use bookhub_core::{Book, BookId, PLACEHOLDER_COVER, Price};

/// A minimal in-stock fiction book priced in whole rupees.
pub fn book(id: &str, rupees: i64) -> Book {
    Book {
        id: BookId::new(id),
        title: format!("Book {id}"),
        author: "Anonymous".to_owned(),
        description: String::new(),
        price: Price::from_rupees(rupees),
        original_price: None,
        rating: 0.0,
        review_count: 0,
        category: "fiction".to_owned(),
        genre: String::new(),
        cover_image: PLACEHOLDER_COVER.to_owned(),
        isbn: String::new(),
        publication_year: 2020,
        language: "English".to_owned(),
        pages: 0,
        in_stock: true,
        stock_quantity: 10,
        is_bestseller: false,
        is_new_arrival: false,
        is_featured: false,
    }
}
