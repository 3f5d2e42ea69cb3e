use reqwest::multipart::{Form, Part};

use denguex_types::IdentifyResult;

use crate::error::ApiError;
use crate::ApiClient;

impl ApiClient {
    /// Upload a mosquito photo for species identification.
    pub async fn identify_mosquito(
        &self,
        image: Vec<u8>,
        file_name: &str,
    ) -> Result<IdentifyResult, ApiError> {
        let form = Form::new().part("image", Part::bytes(image).file_name(file_name.to_string()));
        self.send_json(self.post("identify-mosquito/").multipart(form)).await
    }
}
