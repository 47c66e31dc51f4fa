//! Display locale and the catalog of user-facing messages.
//!
//! The shop is Arabic-first: [`Locale::Ar`] is the default and renders
//! right-to-left. Every message a visitor or admin can see goes through
//! [`Message`] so both languages stay in step.

use serde::{Deserialize, Serialize};

/// A supported display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ar,
    En,
}

impl Locale {
    /// BCP 47 language tag, for the `lang` attribute.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ar => "ar",
            Self::En => "en",
        }
    }

    /// Text direction, for the `dir` attribute.
    #[must_use]
    pub const fn dir(self) -> &'static str {
        match self {
            Self::Ar => "rtl",
            Self::En => "ltr",
        }
    }

    /// Look up a message in this locale.
    #[must_use]
    pub const fn text(self, message: Message) -> &'static str {
        match self {
            Self::Ar => message.arabic(),
            Self::En => message.english(),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ar" => Ok(Self::Ar),
            "en" => Ok(Self::En),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

/// User-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    // Shop chrome
    StoreName,
    Home,
    Products,
    Cart,
    AddToCart,
    Total,
    Remove,
    Checkout,
    CartEmpty,
    OutOfStock,
    InStock,
    RelatedProducts,
    FeaturedProducts,
    Categories,
    AllCategories,
    ProductNotFound,
    NoProducts,
    Reviews,
    // Admin
    AdminPanel,
    Dashboard,
    Login,
    Logout,
    Username,
    Password,
    NewProduct,
    EditProduct,
    Save,
    Delete,
    ConfirmDelete,
    UploadImage,
    ProductName,
    Description,
    Price,
    Category,
    Stock,
    Images,
    ImagesHint,
    Rating,
    Search,
    TotalProducts,
    TotalCategories,
    LowStockProducts,
    Actions,
    Cancel,
    // Errors
    InvalidCredentials,
    CredentialsRequired,
    NameRequired,
    DescriptionRequired,
    PriceMustBePositive,
    CategoryRequired,
    StockMustBePositive,
    ImageRequired,
    GenericError,
}

impl Message {
    const fn arabic(self) -> &'static str {
        match self {
            Self::StoreName => "متجر جذور",
            Self::Home => "الرئيسية",
            Self::Products => "المنتجات",
            Self::Cart => "سلة التسوق",
            Self::AddToCart => "أضف إلى السلة",
            Self::Total => "المجموع",
            Self::Remove => "حذف",
            Self::Checkout => "إتمام الشراء",
            Self::CartEmpty => "السلة فارغة",
            Self::OutOfStock => "نفذت الكمية",
            Self::InStock => "متوفر",
            Self::RelatedProducts => "منتجات ذات صلة",
            Self::FeaturedProducts => "منتجات مميزة",
            Self::Categories => "الفئات",
            Self::AllCategories => "جميع الفئات",
            Self::ProductNotFound => "المنتج غير موجود",
            Self::NoProducts => "لا توجد منتجات",
            Self::Reviews => "تقييم",
            Self::AdminPanel => "لوحة تحكم المتجر",
            Self::Dashboard => "الرئيسية",
            Self::Login => "تسجيل الدخول",
            Self::Logout => "تسجيل الخروج",
            Self::Username => "اسم المستخدم",
            Self::Password => "كلمة المرور",
            Self::NewProduct => "إضافة منتج",
            Self::EditProduct => "تعديل المنتج",
            Self::Save => "حفظ",
            Self::Delete => "حذف",
            Self::ConfirmDelete => "هل أنت متأكد من حذف هذا المنتج؟",
            Self::UploadImage => "رفع صورة",
            Self::ProductName => "اسم المنتج",
            Self::Description => "الوصف",
            Self::Price => "السعر",
            Self::Category => "الفئة",
            Self::Stock => "المخزون",
            Self::Images => "الصور",
            Self::ImagesHint => "رابط صورة واحد في كل سطر",
            Self::Rating => "التقييم",
            Self::Search => "بحث",
            Self::TotalProducts => "عدد المنتجات",
            Self::TotalCategories => "عدد الفئات",
            Self::LowStockProducts => "منتجات قاربت على النفاذ",
            Self::Actions => "إجراءات",
            Self::Cancel => "إلغاء",
            Self::InvalidCredentials => "اسم المستخدم أو كلمة المرور غير صحيحة",
            Self::CredentialsRequired => "يرجى إدخال اسم المستخدم وكلمة المرور",
            Self::NameRequired => "اسم المنتج مطلوب",
            Self::DescriptionRequired => "وصف المنتج مطلوب",
            Self::PriceMustBePositive => "السعر يجب أن يكون أكبر من صفر",
            Self::CategoryRequired => "يرجى اختيار الفئة",
            Self::StockMustBePositive => "عدد المخزون يجب أن يكون أكبر من صفر",
            Self::ImageRequired => "يجب رفع صورة واحدة على الأقل",
            Self::GenericError => "حدث خطأ، يرجى المحاولة مرة أخرى",
        }
    }

    const fn english(self) -> &'static str {
        match self {
            Self::StoreName => "Jozoor Store",
            Self::Home => "Home",
            Self::Products => "Products",
            Self::Cart => "Shopping cart",
            Self::AddToCart => "Add to cart",
            Self::Total => "Total",
            Self::Remove => "Remove",
            Self::Checkout => "Checkout",
            Self::CartEmpty => "Your cart is empty",
            Self::OutOfStock => "Out of stock",
            Self::InStock => "In stock",
            Self::RelatedProducts => "Related products",
            Self::FeaturedProducts => "Featured products",
            Self::Categories => "Categories",
            Self::AllCategories => "All categories",
            Self::ProductNotFound => "Product not found",
            Self::NoProducts => "No products yet",
            Self::Reviews => "reviews",
            Self::AdminPanel => "Store admin",
            Self::Dashboard => "Dashboard",
            Self::Login => "Sign in",
            Self::Logout => "Sign out",
            Self::Username => "Username",
            Self::Password => "Password",
            Self::NewProduct => "New product",
            Self::EditProduct => "Edit product",
            Self::Save => "Save",
            Self::Delete => "Delete",
            Self::ConfirmDelete => "Are you sure you want to delete this product?",
            Self::UploadImage => "Upload image",
            Self::ProductName => "Product name",
            Self::Description => "Description",
            Self::Price => "Price",
            Self::Category => "Category",
            Self::Stock => "Stock",
            Self::Images => "Images",
            Self::ImagesHint => "One image URL per line",
            Self::Rating => "Rating",
            Self::Search => "Search",
            Self::TotalProducts => "Products",
            Self::TotalCategories => "Categories",
            Self::LowStockProducts => "Running low",
            Self::Actions => "Actions",
            Self::Cancel => "Cancel",
            Self::InvalidCredentials => "Invalid username or password",
            Self::CredentialsRequired => "Please enter your username and password",
            Self::NameRequired => "Product name is required",
            Self::DescriptionRequired => "Product description is required",
            Self::PriceMustBePositive => "Price must be greater than zero",
            Self::CategoryRequired => "Please choose a category",
            Self::StockMustBePositive => "Stock count must be greater than zero",
            Self::ImageRequired => "Upload at least one image",
            Self::GenericError => "Something went wrong, please try again",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_arabic_rtl() {
        let locale = Locale::default();
        assert_eq!(locale, Locale::Ar);
        assert_eq!(locale.dir(), "rtl");
        assert_eq!(locale.code(), "ar");
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!(" ar ".parse::<Locale>().unwrap(), Locale::Ar);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_login_error_is_localized() {
        assert_eq!(
            Locale::Ar.text(Message::InvalidCredentials),
            "اسم المستخدم أو كلمة المرور غير صحيحة"
        );
        assert_eq!(
            Locale::En.text(Message::InvalidCredentials),
            "Invalid username or password"
        );
    }
}
